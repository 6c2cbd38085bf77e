//! Frozen item geometry for the duration of one gesture.
//!
//! Placeholder and merge math runs against a [`LayoutSnapshot`] captured when
//! the drag starts, never against the live layout, so the squeeze animation
//! cannot feed back into index computation. The live layout is only consulted
//! through [`LayoutSource`] when a release needs a landing position.

use springdock_core::geometry::Rect;
use springdock_core::math::Vec2;
use springdock_core::profiling::profile_function;

/// Geometry provider implemented by the rendering layer for one container.
pub trait LayoutSource {
    /// Bounds of the container, or `None` if it is not mounted.
    fn container_rect(&self) -> Option<Rect>;

    /// Current rects of the container's items in list order.
    ///
    /// May be shorter than the list if some items are not laid out yet.
    fn item_rects(&self) -> Vec<Rect>;

    /// Resting rect of the item that ends up at `index`, in live coordinates.
    ///
    /// The default continues the row past the last item.
    fn slot_rect(&self, index: usize) -> Option<Rect> {
        let rects = self.item_rects();
        if let Some(rect) = rects.get(index) {
            return Some(*rect);
        }
        let last = rects.last()?;
        let pitch = match rects.len() {
            0 | 1 => last.width,
            n => last.x - rects[n - 2].x,
        };
        let steps = (index + 1 - rects.len()) as f32;
        Some(last.translate(Vec2::new(pitch * steps, 0.0)))
    }
}

/// One frozen item.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub id: String,
    pub index: usize,
    pub rect: Rect,
    pub center: Vec2,
}

impl SnapshotEntry {
    pub fn new(id: impl Into<String>, index: usize, rect: Rect) -> Self {
        Self {
            id: id.into(),
            index,
            rect,
            center: rect.center(),
        }
    }
}

/// Ordered, immutable item geometry captured at drag start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    entries: Vec<SnapshotEntry>,
    container: Option<Rect>,
}

impl LayoutSnapshot {
    pub fn from_entries(entries: Vec<SnapshotEntry>, container: Option<Rect>) -> Self {
        Self { entries, container }
    }

    /// Freeze `source` for the items identified by `ids`, in list order.
    ///
    /// Items without a rect are left out; the caller falls back to
    /// appending for slots the snapshot cannot resolve.
    pub fn capture<'a>(
        source: &dyn LayoutSource,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        profile_function!();
        let rects = source.item_rects();
        let entries: Vec<SnapshotEntry> = ids
            .into_iter()
            .zip(rects.iter())
            .enumerate()
            .map(|(index, (id, rect))| SnapshotEntry::new(id, index, *rect))
            .collect();
        let container = source.container_rect();
        if container.is_none() {
            tracing::warn!("container rect unavailable at snapshot capture");
        }
        tracing::trace!(entries = entries.len(), "captured layout snapshot");
        Self { entries, container }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Entry for list index `index`.
    pub fn entry(&self, index: usize) -> Option<&SnapshotEntry> {
        match self.entries.get(index) {
            Some(entry) if entry.index == index => Some(entry),
            _ => self.entries.iter().find(|entry| entry.index == index),
        }
    }

    pub fn container(&self) -> Option<&Rect> {
        self.container.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bottom edge of the lowest item.
    pub fn last_row_bottom(&self) -> Option<f32> {
        self.entries
            .iter()
            .map(|entry| entry.rect.bottom())
            .reduce(f32::max)
    }

    /// Center-to-center spacing: horizontal between the first two items on
    /// the first row, vertical between the first and second rows.
    pub fn pitch(&self) -> Option<Vec2> {
        let first = self.entries.first()?;
        let dx = self
            .entries
            .iter()
            .skip(1)
            .find(|entry| (entry.center.y - first.center.y).abs() < f32::EPSILON)
            .map(|entry| entry.center.x - first.center.x);
        let dy = self
            .entries
            .iter()
            .map(|entry| entry.center.y - first.center.y)
            .find(|dy| *dy > f32::EPSILON);
        match (dx, dy) {
            (None, None) => None,
            (dx, dy) => Some(Vec2::new(
                dx.unwrap_or(first.rect.width),
                dy.unwrap_or(first.rect.height),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(Vec<Rect>);

    impl LayoutSource for Row {
        fn container_rect(&self) -> Option<Rect> {
            Some(Rect::new(0.0, 0.0, 300.0, 50.0))
        }

        fn item_rects(&self) -> Vec<Rect> {
            self.0.clone()
        }
    }

    fn row(n: usize) -> Row {
        Row((0..n).map(|i| Rect::new(i as f32 * 60.0, 0.0, 50.0, 50.0)).collect())
    }

    #[test]
    fn test_capture_zips_ids_and_rects() {
        let snapshot = LayoutSnapshot::capture(&row(3), ["a", "b", "c", "d"]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.entry(1).unwrap().id, "b");
        assert_eq!(snapshot.entry(2).unwrap().center, Vec2::new(145.0, 25.0));
        assert!(snapshot.container().is_some());
    }

    #[test]
    fn test_default_slot_rect_extends_row() {
        let layout = row(3);
        assert_eq!(layout.slot_rect(1), Some(Rect::new(60.0, 0.0, 50.0, 50.0)));
        assert_eq!(layout.slot_rect(3), Some(Rect::new(180.0, 0.0, 50.0, 50.0)));
        assert_eq!(row(0).slot_rect(0), None);
    }

    #[test]
    fn test_pitch() {
        let snapshot = LayoutSnapshot::capture(&row(3), ["a", "b", "c"]);
        assert_eq!(snapshot.pitch(), Some(Vec2::new(60.0, 50.0)));
        assert_eq!(LayoutSnapshot::default().pitch(), None);
    }

    #[test]
    fn test_last_row_bottom() {
        let snapshot = LayoutSnapshot::from_entries(
            vec![
                SnapshotEntry::new("a", 0, Rect::new(0.0, 0.0, 10.0, 10.0)),
                SnapshotEntry::new("b", 1, Rect::new(0.0, 20.0, 10.0, 10.0)),
            ],
            None,
        );
        assert_eq!(snapshot.last_row_bottom(), Some(30.0));
    }
}
