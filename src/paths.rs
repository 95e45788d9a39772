use anyhow::{Context, Result};
use std::path::PathBuf;

/// Override for the default application directories.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Build from CLI arguments and environment.
    ///
    /// Priority: CLI arg → GIFFORGE_CONFIG_DIR env var → None (platform defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| {
            std::env::var("GIFFORGE_CONFIG_DIR").ok().map(PathBuf::from)
        });

        Self { config_dir }
    }
}

/// Path to a configuration file (app settings).
///
/// Priority:
/// 1. --config-dir / GIFFORGE_CONFIG_DIR
/// 2. Current directory IF a gifforge config file already exists there (portable mode)
/// 3. Platform config directory (dirs-next), e.g. ~/.config/gifforge/{name} on Linux
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    get_config_dir(config).join(name)
}

/// Path to a data file (logs).
///
/// Same priority chain as [`config_file`] but falling back to the platform
/// data directory, e.g. ~/.local/share/gifforge/{name} on Linux.
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    get_data_dir(config).join(name)
}

/// Create the config and data directories if they do not exist yet.
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = get_config_dir(config);
    let data_dir = get_data_dir(config);

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
    }

    if data_dir != config_dir && !data_dir.exists() {
        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create data directory: {}", data_dir.display())
        })?;
    }

    Ok(())
}

/// Portable mode marker: any gifforge file already sitting next to the binary.
fn has_local_config_files(dir: &PathBuf) -> bool {
    let files = ["gifforge.json", "gifforge.log"];
    files.iter().any(|f| dir.join(f).exists())
}

fn get_config_dir(config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(current_dir) = std::env::current_dir() {
        if has_local_config_files(&current_dir) {
            return current_dir;
        }
    }

    if let Some(dir) = dirs_next::config_dir() {
        return dir.join("gifforge");
    }

    PathBuf::from(".")
}

fn get_data_dir(config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(current_dir) = std::env::current_dir() {
        if has_local_config_files(&current_dir) {
            return current_dir;
        }
    }

    if let Some(dir) = dirs_next::data_dir() {
        return dir.join("gifforge");
    }

    PathBuf::from(".")
}
