//! Template: a saved snapshot of sequence + settings, not the animated
//! output itself.
//!
//! The on-disk record keeps every scalar as a string (`duration: "200"`)
//! so templates written by older builds of the tool load unchanged. There
//! is no schema version; missing fields substitute their defaults
//! field-by-field.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sequence::Sequence;
use crate::settings::ResolutionChoice;

fn default_duration() -> String {
    "200".to_string()
}

fn default_loop() -> String {
    "0".to_string()
}

fn default_resolution() -> String {
    "Original".to_string()
}

/// Persisted template record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Ordered source image paths.
    #[serde(default)]
    pub images: Vec<String>,

    /// Delay between frames in milliseconds, string-encoded.
    #[serde(default = "default_duration")]
    pub duration: String,

    /// Loop count ("0" = infinite), string-encoded.
    #[serde(rename = "loop", default = "default_loop")]
    pub loop_count: String,

    /// Resolution label ("Original", "640x480", ..., "Custom").
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Custom dimensions; meaningful only when resolution is "Custom".
    #[serde(default)]
    pub custom_width: String,
    #[serde(default)]
    pub custom_height: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            duration: default_duration(),
            loop_count: default_loop(),
            resolution: default_resolution(),
            custom_width: String::new(),
            custom_height: String::new(),
        }
    }
}

impl Template {
    /// Snapshot the current UI state into a record.
    pub fn from_state(
        sequence: &Sequence,
        duration: &str,
        loop_count: &str,
        resolution: ResolutionChoice,
        custom_width: &str,
        custom_height: &str,
    ) -> Self {
        let custom = resolution == ResolutionChoice::Custom;
        Self {
            images: sequence
                .paths()
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            duration: duration.to_string(),
            loop_count: loop_count.to_string(),
            resolution: resolution.label().to_string(),
            custom_width: if custom { custom_width.to_string() } else { String::new() },
            custom_height: if custom { custom_height.to_string() } else { String::new() },
        }
    }

    /// Rebuild the ordered sequence from the stored path strings.
    pub fn sequence(&self) -> Sequence {
        Sequence::from_paths(self.images.iter().map(PathBuf::from))
    }

    pub fn resolution_choice(&self) -> ResolutionChoice {
        ResolutionChoice::from_label(&self.resolution)
    }

    /// Serialize to a JSON file. The `.json` extension is forced if absent.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Serialize template error: {}", e))?;

        let path = path.as_ref();
        let path = if path.extension().and_then(|s| s.to_str()) != Some("json") {
            path.with_extension("json")
        } else {
            path.to_path_buf()
        };

        fs::write(&path, json).map_err(|e| format!("Write template error: {}", e))?;
        Ok(path)
    }

    /// Load a template record; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let json = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Read template error: {}", e))?;

        serde_json::from_str(&json).map_err(|e| format!("Parse template error: {}", e))
    }
}
