//! GIF export: decode the ordered sources, optionally resize, encode one
//! animated file.
//!
//! Whole-file semantics: all sources are decoded (and resized) before the
//! destination is created, and a destination left half-written by an
//! encode failure is removed.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, DynamicImage, Frame, RgbaImage};
use log::{info, warn};

use crate::settings::ExportSettings;

/// Export failures, surfaced to the user verbatim.
#[derive(Debug)]
pub enum ExportError {
    EmptySequence,
    ReadFrame {
        path: PathBuf,
        source: image::ImageError,
    },
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    EncodeFrame {
        index: usize,
        source: image::ImageError,
    },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::EmptySequence => write!(f, "No frames to export"),
            ExportError::ReadFrame { path, source } => {
                write!(f, "Failed to read frame {}: {}", path.display(), source)
            }
            ExportError::CreateOutput { path, source } => {
                write!(f, "Failed to create output {}: {}", path.display(), source)
            }
            ExportError::EncodeFrame { index, source } => {
                write!(f, "Failed to encode frame {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for ExportError {}

/// Decode every source frame, resizing to `size` when given.
///
/// Shared by export and preview; frames come back in sequence order.
pub fn load_frames(
    paths: &[PathBuf],
    size: Option<(u32, u32)>,
) -> Result<Vec<RgbaImage>, ExportError> {
    if paths.is_empty() {
        return Err(ExportError::EmptySequence);
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let img = image::open(path).map_err(|source| ExportError::ReadFrame {
            path: path.clone(),
            source,
        })?;
        frames.push(resize_frame(img, size).to_rgba8());
    }
    Ok(frames)
}

fn resize_frame(img: DynamicImage, size: Option<(u32, u32)>) -> DynamicImage {
    match size {
        Some((w, h)) => img.resize_exact(w, h, FilterType::Lanczos3),
        None => img,
    }
}

/// Encode the ordered sources into one animated GIF at `dest`.
///
/// Loop count 0 maps to an infinite loop per the GIF netscape extension
/// convention; every frame gets the same delay.
pub fn export_gif(
    paths: &[PathBuf],
    settings: &ExportSettings,
    dest: &Path,
) -> Result<(), ExportError> {
    let frames = load_frames(paths, settings.size)?;

    info!(
        "Exporting {} frame(s) to {} (delay {}ms, loop {}, size {:?})",
        frames.len(),
        dest.display(),
        settings.delay_ms,
        settings.loop_count,
        settings.size
    );

    let file = File::create(dest).map_err(|source| ExportError::CreateOutput {
        path: dest.to_path_buf(),
        source,
    })?;

    let result = encode_frames(BufWriter::new(file), frames, settings);
    if result.is_err() {
        // Do not leave a half-written file behind
        if let Err(e) = std::fs::remove_file(dest) {
            warn!("Failed to remove partial output {}: {}", dest.display(), e);
        }
    }
    result
}

fn encode_frames(
    writer: BufWriter<File>,
    frames: Vec<RgbaImage>,
    settings: &ExportSettings,
) -> Result<(), ExportError> {
    let mut encoder = GifEncoder::new(writer);

    let repeat = if settings.loop_count == 0 {
        Repeat::Infinite
    } else {
        Repeat::Finite(settings.loop_count.min(u16::MAX as u32) as u16)
    };
    encoder
        .set_repeat(repeat)
        .map_err(|source| ExportError::EncodeFrame { index: 0, source })?;

    let delay = Delay::from_numer_denom_ms(settings.delay_ms, 1);
    for (index, buffer) in frames.into_iter().enumerate() {
        let frame = Frame::from_parts(buffer, 0, 0, delay);
        encoder
            .encode_frame(frame)
            .map_err(|source| ExportError::EncodeFrame { index, source })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use std::io::BufReader;
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gifforge_export_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, rgba: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(w, h, Rgba(rgba));
        img.save(&path).unwrap();
        path
    }

    fn decoded_frames(path: &Path) -> Vec<image::Frame> {
        let decoder = GifDecoder::new(BufReader::new(File::open(path).unwrap())).unwrap();
        decoder.into_frames().collect_frames().unwrap()
    }

    /// Locate the netscape application extension and return its loop value.
    fn netscape_loop_count(path: &Path) -> Option<u16> {
        let bytes = std::fs::read(path).unwrap();
        let marker = b"NETSCAPE2.0";
        let pos = bytes.windows(marker.len()).position(|w| w == marker)?;
        // After the 11-byte identifier: sub-block size, id byte, then u16 LE count
        let lo = *bytes.get(pos + marker.len() + 2)?;
        let hi = *bytes.get(pos + marker.len() + 3)?;
        Some(u16::from_le_bytes([lo, hi]))
    }

    #[test]
    fn test_export_preserves_count_delay_and_infinite_loop() {
        let dir = scratch_dir("basic");
        let paths = vec![
            write_png(&dir, "a.png", 8, 6, [255, 0, 0, 255]),
            write_png(&dir, "b.png", 8, 6, [0, 255, 0, 255]),
            write_png(&dir, "c.png", 8, 6, [0, 0, 255, 255]),
        ];
        let dest = dir.join("out.gif");

        let settings = ExportSettings {
            delay_ms: 100,
            loop_count: 0,
            size: None,
        };
        export_gif(&paths, &settings, &dest).unwrap();

        let frames = decoded_frames(&dest);
        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!(Duration::from(frame.delay()), Duration::from_millis(100));
            assert_eq!(frame.buffer().width(), 8);
            assert_eq!(frame.buffer().height(), 6);
        }
        assert_eq!(netscape_loop_count(&dest), Some(0)); // 0 = infinite
    }

    #[test]
    fn test_export_finite_loop_count() {
        let dir = scratch_dir("finite");
        let paths = vec![write_png(&dir, "a.png", 4, 4, [10, 20, 30, 255])];
        let dest = dir.join("out.gif");

        let settings = ExportSettings {
            delay_ms: 200,
            loop_count: 5,
            size: None,
        };
        export_gif(&paths, &settings, &dest).unwrap();

        assert_eq!(netscape_loop_count(&dest), Some(5));
    }

    #[test]
    fn test_export_resizes_every_frame_to_target() {
        let dir = scratch_dir("resize");
        // Mixed source sizes on purpose
        let paths = vec![
            write_png(&dir, "big.png", 120, 90, [255, 255, 0, 255]),
            write_png(&dir, "small.png", 16, 16, [0, 255, 255, 255]),
        ];
        let dest = dir.join("out.gif");

        let settings = ExportSettings {
            delay_ms: 100,
            loop_count: 0,
            size: Some((50, 50)),
        };
        export_gif(&paths, &settings, &dest).unwrap();

        for frame in decoded_frames(&dest) {
            assert_eq!(frame.buffer().width(), 50);
            assert_eq!(frame.buffer().height(), 50);
        }
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        let dir = scratch_dir("empty");
        let dest = dir.join("out.gif");

        let err = export_gif(&[], &ExportSettings::default(), &dest).unwrap_err();
        assert!(matches!(err, ExportError::EmptySequence));
        assert!(!dest.exists());
    }

    #[test]
    fn test_unreadable_source_fails_before_output_is_created() {
        let dir = scratch_dir("unreadable");
        let paths = vec![dir.join("missing.png")];
        let dest = dir.join("out.gif");

        let err = export_gif(&paths, &ExportSettings::default(), &dest).unwrap_err();
        assert!(matches!(err, ExportError::ReadFrame { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let dir = scratch_dir("unwritable");
        let paths = vec![write_png(&dir, "a.png", 4, 4, [1, 2, 3, 255])];
        let dest = dir.join("no_such_dir").join("out.gif");

        let err = export_gif(&paths, &ExportSettings::default(), &dest).unwrap_err();
        assert!(matches!(err, ExportError::CreateOutput { .. }));
    }

    #[test]
    fn test_load_frames_resizes_for_preview() {
        let dir = scratch_dir("load");
        let paths = vec![write_png(&dir, "a.png", 64, 48, [9, 9, 9, 255])];

        let frames = load_frames(&paths, Some((32, 24))).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!((frames[0].width(), frames[0].height()), (32, 24));
    }
}
