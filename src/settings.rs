//! Export settings: per-frame delay, loop count, output resolution.

use serde::{Deserialize, Serialize};

/// Output resolution selection.
///
/// `Original` keeps each frame at its source size; the presets and
/// `Custom` resize every frame to one fixed size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionChoice {
    #[default]
    Original,
    Vga,  // 640x480
    Svga, // 800x600
    Xga,  // 1024x768
    Custom,
}

impl ResolutionChoice {
    pub fn all() -> &'static [ResolutionChoice] {
        &[
            ResolutionChoice::Original,
            ResolutionChoice::Vga,
            ResolutionChoice::Svga,
            ResolutionChoice::Xga,
            ResolutionChoice::Custom,
        ]
    }

    /// Stable label used in the UI combo box and in template files.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionChoice::Original => "Original",
            ResolutionChoice::Vga => "640x480",
            ResolutionChoice::Svga => "800x600",
            ResolutionChoice::Xga => "1024x768",
            ResolutionChoice::Custom => "Custom",
        }
    }

    /// Parse a template label. Unknown labels fall back to `Original`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "640x480" => ResolutionChoice::Vga,
            "800x600" => ResolutionChoice::Svga,
            "1024x768" => ResolutionChoice::Xga,
            "Custom" => ResolutionChoice::Custom,
            _ => ResolutionChoice::Original,
        }
    }

    /// Concrete target size, if any. `Custom` uses the provided pair.
    pub fn target_size(&self, custom: Option<(u32, u32)>) -> Option<(u32, u32)> {
        match self {
            ResolutionChoice::Original => None,
            ResolutionChoice::Vga => Some((640, 480)),
            ResolutionChoice::Svga => Some((800, 600)),
            ResolutionChoice::Xga => Some((1024, 768)),
            ResolutionChoice::Custom => custom,
        }
    }
}

impl std::fmt::Display for ResolutionChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Transient settings for one export or preview call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportSettings {
    /// Delay between frames in milliseconds (positive).
    pub delay_ms: u32,
    /// Loop count; 0 means loop forever.
    pub loop_count: u32,
    /// Resize target; None keeps original frame sizes.
    pub size: Option<(u32, u32)>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            delay_ms: 200,
            loop_count: 0,
            size: None,
        }
    }
}
