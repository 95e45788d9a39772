//! Live preview: cycles the decoded frames in a dedicated window.
//!
//! Frames are decoded (and resized) eagerly when the preview starts.
//! Scheduling is cooperative on the egui loop: each render checks the
//! elapsed time, advances the frame index when a delay interval has
//! passed, and asks for a repaint when the next frame is due. Closing
//! the window drops the whole state, which is the only cancellation
//! needed.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;
use log::info;

use crate::export::{self, ExportError};

pub struct Preview {
    frames: Vec<egui::ColorImage>,
    /// Uploaded lazily on first display, then reused.
    textures: Vec<Option<egui::TextureHandle>>,
    current: usize,
    delay: Duration,
    last_advance: Option<Instant>,
    open: bool,
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("frames", &self.frames.len())
            .field("current", &self.current)
            .field("delay", &self.delay)
            .field("last_advance", &self.last_advance)
            .field("open", &self.open)
            .finish()
    }
}

impl Preview {
    /// Decode all frames up front. Fails like export does: empty sequence
    /// or an unreadable source aborts the preview before a window opens.
    pub fn build(
        paths: &[PathBuf],
        delay_ms: u32,
        size: Option<(u32, u32)>,
    ) -> Result<Self, ExportError> {
        let buffers = export::load_frames(paths, size)?;
        info!(
            "Preview: {} frame(s), {}ms per frame, size {:?}",
            buffers.len(),
            delay_ms,
            size
        );

        let frames: Vec<egui::ColorImage> = buffers
            .into_iter()
            .map(|buf| {
                let dims = [buf.width() as usize, buf.height() as usize];
                egui::ColorImage::from_rgba_unmultiplied(dims, buf.as_raw())
            })
            .collect();
        let count = frames.len();

        Ok(Self {
            frames,
            textures: vec![None; count],
            current: 0,
            delay: Duration::from_millis(u64::from(delay_ms.max(1))),
            last_advance: None,
            open: true,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Advance to the next frame (wrapping) if a full delay has elapsed.
    /// Returns the time until the following frame is due.
    fn advance_if_due(&mut self, now: Instant) -> Duration {
        let last = match self.last_advance {
            Some(t) => t,
            None => {
                self.last_advance = Some(now);
                return self.delay;
            }
        };

        let elapsed = now.duration_since(last);
        if elapsed >= self.delay {
            self.current = (self.current + 1) % self.frames.len();
            self.last_advance = Some(now);
            self.delay
        } else {
            self.delay - elapsed
        }
    }

    /// Render the preview window. Returns false once the user closed it.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        if !self.open || self.frames.is_empty() {
            return false;
        }

        let remaining = self.advance_if_due(Instant::now());

        let index = self.current;
        if self.textures[index].is_none() {
            let name = format!("preview_frame_{}", index);
            self.textures[index] = Some(ctx.load_texture(
                name,
                self.frames[index].clone(),
                egui::TextureOptions::LINEAR,
            ));
        }

        let mut open = self.open;
        egui::Window::new("GIF Preview")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                if let Some(texture) = &self.textures[index] {
                    let size = texture.size_vec2();
                    ui.image((texture.id(), size));
                }
            });
        self.open = open;

        if self.open {
            // Wake up exactly when the next frame is due
            ctx.request_repaint_after(remaining);
        }
        self.open
    }
}
