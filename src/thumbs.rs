//! Thumbnail strip cache.
//!
//! Thumbnails are decoded once per frame identity and kept as uploaded
//! textures; entries for frames removed from the sequence are dropped.
//! A frame that fails to decode caches the failure so the strip does not
//! retry it every repaint.

use std::collections::HashMap;

use eframe::egui;
use log::warn;
use uuid::Uuid;

use crate::sequence::{FrameRef, Sequence};

/// Max edge of a thumbnail in pixels, aspect preserved.
pub const THUMB_EDGE: u32 = 100;

#[derive(Default)]
pub struct ThumbCache {
    /// None marks a frame whose source failed to decode.
    entries: HashMap<Uuid, Option<egui::TextureHandle>>,
}

impl ThumbCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for one frame, decoding and uploading on first request.
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        frame: &FrameRef,
    ) -> Option<egui::TextureHandle> {
        if let Some(entry) = self.entries.get(&frame.id) {
            return entry.clone();
        }

        let entry = match image::open(&frame.path) {
            Ok(img) => {
                let thumb = img.thumbnail(THUMB_EDGE, THUMB_EDGE).to_rgba8();
                let dims = [thumb.width() as usize, thumb.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(dims, thumb.as_raw());
                Some(ctx.load_texture(
                    format!("thumb_{}", frame.id),
                    color_image,
                    egui::TextureOptions::LINEAR,
                ))
            }
            Err(e) => {
                warn!("Thumbnail decode failed for {}: {}", frame.path.display(), e);
                None
            }
        };

        self.entries.insert(frame.id, entry.clone());
        entry
    }

    /// Drop cache entries whose frames are no longer in the sequence.
    pub fn retain(&mut self, sequence: &Sequence) {
        let live: std::collections::HashSet<Uuid> = sequence.iter().map(|f| f.id).collect();
        self.entries.retain(|id, _| live.contains(id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gifforge_thumbs_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_decodes_once_and_caches() {
        let dir = scratch_dir("cache");
        let path = dir.join("a.png");
        RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let ctx = egui::Context::default();
        let mut cache = ThumbCache::new();
        let frame = FrameRef::new(&path);

        let tex = cache.texture(&ctx, &frame).unwrap();
        // 200x100 source scaled to the 100px max edge keeps aspect: 100x50
        assert_eq!(tex.size(), [100, 50]);
        assert_eq!(cache.len(), 1);

        // Second request hits the cache
        let again = cache.texture(&ctx, &frame).unwrap();
        assert_eq!(again.id(), tex.id());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_decode_failure_is_cached_as_placeholder() {
        let ctx = egui::Context::default();
        let mut cache = ThumbCache::new();
        let frame = FrameRef::new("/nonexistent/missing.png");

        assert!(cache.texture(&ctx, &frame).is_none());
        // Failure is remembered, not retried
        assert_eq!(cache.len(), 1);
        assert!(cache.texture(&ctx, &frame).is_none());
    }

    #[test]
    fn test_retain_drops_removed_frames() {
        let dir = scratch_dir("retain");
        let path = dir.join("a.png");
        RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255]))
            .save(&path)
            .unwrap();

        let ctx = egui::Context::default();
        let mut cache = ThumbCache::new();

        let mut seq = Sequence::new();
        seq.add(&path);
        seq.add(&path);
        for frame in seq.iter() {
            cache.texture(&ctx, frame);
        }
        assert_eq!(cache.len(), 2);

        seq.remove(0);
        cache.retain(&seq);
        assert_eq!(cache.len(), 1);
    }
}
