//! Stateless hit-testing and insertion math over a [`LayoutSnapshot`].

use springdock_core::geometry::Rect;
use springdock_core::math::Vec2;

use super::snapshot::LayoutSnapshot;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Inclusive containment test with an outward `buffer`.
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect, buffer: f32) -> bool {
    rect.expand(buffer).contains(point)
}

/// Result of [`closest_item`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestItem {
    pub index: usize,
    pub distance: f32,
}

/// Nearest snapshot entry to `pointer` by center distance.
///
/// Ties go to the first entry in snapshot order. `skip` excludes one index
/// (the dragged item).
pub fn closest_item(
    pointer: Vec2,
    snapshot: &LayoutSnapshot,
    skip: Option<usize>,
) -> Option<ClosestItem> {
    let mut best: Option<ClosestItem> = None;
    for entry in snapshot.entries() {
        if Some(entry.index) == skip {
            continue;
        }
        let d = distance(pointer, entry.center);
        if best.is_none_or(|b| d < b.distance) {
            best = Some(ClosestItem {
                index: entry.index,
                distance: d,
            });
        }
    }
    best
}

/// Insertion slot for a horizontal row.
///
/// The first slot whose item center lies right of `pointer_x`; a pointer
/// exactly on a center inserts before that item. Falls back to `count`.
pub fn linear_insert_index(pointer_x: f32, snapshot: &LayoutSnapshot, count: usize) -> usize {
    snapshot
        .entries()
        .iter()
        .take(count)
        .position(|entry| pointer_x < entry.center.x)
        .unwrap_or(count)
}

/// Insertion slot for a grid.
///
/// Below the last row (when the container is known) appends. Otherwise the
/// nearest item decides: left of its center plus `bias` inserts before it,
/// anything else inserts after.
pub fn grid_insert_index(
    pointer: Vec2,
    snapshot: &LayoutSnapshot,
    count: usize,
    container: Option<&Rect>,
    bias: f32,
) -> usize {
    if container.is_some()
        && let Some(last_bottom) = snapshot.last_row_bottom()
        && pointer.y > last_bottom
    {
        return count;
    }

    match closest_item(pointer, snapshot, None) {
        Some(nearest) => {
            let Some(entry) = snapshot.entry(nearest.index) else {
                return count;
            };
            let slot = if pointer.x < entry.center.x + bias {
                nearest.index
            } else {
                nearest.index + 1
            };
            slot.min(count)
        }
        None => count,
    }
}
