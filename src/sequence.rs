//! Ordered frame list: the source material of the animation.
//!
//! Every entry carries a fresh Uuid so the same image file can appear in
//! the sequence any number of times without the UI rows colliding. Order
//! is significant and maps one-to-one onto output frame order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One still image contributing one step of the animation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRef {
    /// Synthetic identity tag, unique per entry (not per file).
    pub id: Uuid,
    /// Path to the source image.
    pub path: PathBuf,
}

impl FrameRef {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
        }
    }

    /// File name for list rows; falls back to the full path string.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// User-editable ordered list of frame references.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Sequence {
    frames: Vec<FrameRef>,
}

impl Sequence {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Rebuild from ordered paths (template load). Fresh ids are generated.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            frames: paths.into_iter().map(FrameRef::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameRef> {
        self.frames.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FrameRef> {
        self.frames.get(index)
    }

    /// Ordered source paths for export, preview and persistence.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.frames.iter().map(|f| f.path.clone()).collect()
    }

    /// Append one image, generating a fresh identity tag.
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) {
        self.frames.push(FrameRef::new(path));
    }

    /// Append several images in the given order.
    pub fn add_all<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add(path.as_ref().to_path_buf());
        }
    }

    /// Remove the entry at `index`. Relative order of the rest is unchanged.
    pub fn remove(&mut self, index: usize) -> Option<FrameRef> {
        if index < self.frames.len() {
            Some(self.frames.remove(index))
        } else {
            None
        }
    }

    /// Swap with the previous entry. No-op on the first entry.
    /// Returns the new index of the moved entry.
    pub fn move_up(&mut self, index: usize) -> usize {
        if index > 0 && index < self.frames.len() {
            self.frames.swap(index, index - 1);
            index - 1
        } else {
            index
        }
    }

    /// Swap with the next entry. No-op on the last entry.
    /// Returns the new index of the moved entry.
    pub fn move_down(&mut self, index: usize) -> usize {
        if index + 1 < self.frames.len() {
            self.frames.swap(index, index + 1);
            index + 1
        } else {
            index
        }
    }

    /// Remove-and-insert move used by drag-and-drop reordering.
    ///
    /// `to` follows the egui_dnd convention: the insertion slot in the list
    /// as it looks *before* the dragged entry is taken out.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.frames.len() || to > self.frames.len() || from == to {
            return;
        }
        let frame = self.frames.remove(from);
        let insert_at = if to > from { to - 1 } else { to };
        self.frames.insert(insert_at, frame);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(names: &[&str]) -> Sequence {
        Sequence::from_paths(names.iter().map(|n| format!("/img/{n}")))
    }

    fn names(s: &Sequence) -> Vec<String> {
        s.iter().map(|f| f.display_name()).collect()
    }

    #[test]
    fn test_add_keeps_order_and_allows_duplicates() {
        let mut s = Sequence::new();
        s.add("/img/a.png");
        s.add("/img/b.png");
        s.add("/img/a.png");

        assert_eq!(names(&s), ["a.png", "b.png", "a.png"]);
        // Same path, distinct identity
        assert_ne!(s.get(0).unwrap().id, s.get(2).unwrap().id);
    }

    #[test]
    fn test_move_up_is_pure_permutation() {
        let mut s = seq(&["a.png", "b.png", "c.png"]);
        let ids: Vec<_> = s.iter().map(|f| f.id).collect();

        let new_idx = s.move_up(2);
        assert_eq!(new_idx, 1);
        assert_eq!(names(&s), ["a.png", "c.png", "b.png"]);
        assert_eq!(s.len(), 3);

        // Only positions changed, identities survive
        let mut moved_ids: Vec<_> = s.iter().map(|f| f.id).collect();
        moved_ids.sort();
        let mut orig_ids = ids;
        orig_ids.sort();
        assert_eq!(moved_ids, orig_ids);
    }

    #[test]
    fn test_move_first_up_and_last_down_are_noops() {
        let mut s = seq(&["a.png", "b.png", "c.png"]);

        assert_eq!(s.move_up(0), 0);
        assert_eq!(names(&s), ["a.png", "b.png", "c.png"]);

        assert_eq!(s.move_down(2), 2);
        assert_eq!(names(&s), ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_move_down_swaps_neighbours() {
        let mut s = seq(&["a.png", "b.png", "c.png"]);
        assert_eq!(s.move_down(0), 1);
        assert_eq!(names(&s), ["b.png", "a.png", "c.png"]);
    }

    #[test]
    fn test_remove_shortens_by_one_preserving_rest() {
        let mut s = seq(&["a.png", "b.png", "c.png", "d.png"]);
        let removed = s.remove(1).unwrap();

        assert_eq!(removed.display_name(), "b.png");
        assert_eq!(s.len(), 3);
        assert_eq!(names(&s), ["a.png", "c.png", "d.png"]);
    }

    #[test]
    fn test_remove_out_of_range_is_none() {
        let mut s = seq(&["a.png"]);
        assert!(s.remove(5).is_none());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_reorder_forward_and_backward() {
        // Forward drag: a to the slot after c
        let mut s = seq(&["a.png", "b.png", "c.png"]);
        s.reorder(0, 3);
        assert_eq!(names(&s), ["b.png", "c.png", "a.png"]);

        // Backward drag: c before a
        let mut s = seq(&["a.png", "b.png", "c.png"]);
        s.reorder(2, 0);
        assert_eq!(names(&s), ["c.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_paths_in_order() {
        let s = seq(&["a.png", "b.png"]);
        assert_eq!(
            s.paths(),
            [PathBuf::from("/img/a.png"), PathBuf::from("/img/b.png")]
        );
    }
}
