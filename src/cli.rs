use clap::Parser;
use std::path::PathBuf;

// Build version with codec info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "GIF:    image 0.25 (pure Rust)\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Animated GIF assembler
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Images to pre-populate the frame sequence (in order)
    #[arg(value_name = "FILE")]
    pub images: Vec<PathBuf>,

    /// Template file to load on startup
    #[arg(short = 't', long = "template", value_name = "TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Enable debug logging to file (default: gifforge.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}
