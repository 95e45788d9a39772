//! GIFFORGE - Animated GIF assembler library
//!
//! Re-exports all modules for use by the binary target.

pub mod cli;
pub mod export;
pub mod paths;
pub mod preview;
pub mod sequence;
pub mod settings;
pub mod template;
pub mod thumbs;

// Re-export commonly used types
pub use export::{export_gif, ExportError};
pub use preview::Preview;
pub use sequence::{FrameRef, Sequence};
pub use settings::{ExportSettings, ResolutionChoice};
pub use template::Template;
pub use thumbs::ThumbCache;
