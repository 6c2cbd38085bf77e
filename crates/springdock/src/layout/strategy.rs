//! Per-container insertion and squeeze policies.
//!
//! A strategy answers two questions for its container shape: which slot the
//! pointer points at, and how far each resting item slides to open the gap
//! for that slot. Both are pure functions of their arguments.

use springdock_core::math::Vec2;

use super::geometry::{grid_insert_index, linear_insert_index};
use super::snapshot::LayoutSnapshot;
use crate::model::{final_index, is_noop_slot};

/// Insertion and displacement policy for one container shape.
pub trait LayoutStrategy: std::fmt::Debug {
    /// Insertion slot (`0..=len`) for `pointer` against the frozen layout.
    fn insert_index(&self, pointer: Vec2, snapshot: &LayoutSnapshot) -> usize;

    /// Visual offset of the resting item at `item_index` while a drag targets
    /// `target_slot`.
    ///
    /// `original` is the dragged item's source index, or `None` when the item
    /// comes from another container. Inactive drags and missing targets
    /// produce no offset.
    fn displacement(
        &self,
        item_index: usize,
        target_slot: Option<usize>,
        original: Option<usize>,
        active: bool,
    ) -> Vec2;

    /// Adopt cell metrics from a freshly captured snapshot.
    fn calibrate(&mut self, _snapshot: &LayoutSnapshot) {}
}

/// Which resting items move, and in which direction, for a pending drop.
///
/// Returns `+1` for items pushed toward the end, `-1` for items pulled toward
/// the start, `0` otherwise.
fn shift_direction(item_index: usize, target_slot: usize, original: Option<usize>) -> i32 {
    let Some(original) = original else {
        return i32::from(item_index >= target_slot);
    };
    if item_index == original || is_noop_slot(original, target_slot) {
        return 0;
    }
    let target = final_index(original, target_slot);
    if target < original && (target..original).contains(&item_index) {
        1
    } else if target > original && (original + 1..=target).contains(&item_index) {
        -1
    } else {
        0
    }
}

/// Single-row dock layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalStrategy {
    /// Distance between neighbouring item origins.
    pub cell_width: f32,
}

impl HorizontalStrategy {
    pub fn new(cell_width: f32) -> Self {
        Self { cell_width }
    }
}

impl LayoutStrategy for HorizontalStrategy {
    fn insert_index(&self, pointer: Vec2, snapshot: &LayoutSnapshot) -> usize {
        linear_insert_index(pointer.x, snapshot, snapshot.len())
    }

    fn displacement(
        &self,
        item_index: usize,
        target_slot: Option<usize>,
        original: Option<usize>,
        active: bool,
    ) -> Vec2 {
        let Some(target_slot) = target_slot.filter(|_| active) else {
            return Vec2::ZERO;
        };
        let direction = shift_direction(item_index, target_slot, original);
        Vec2::new(direction as f32 * self.cell_width, 0.0)
    }

    fn calibrate(&mut self, snapshot: &LayoutSnapshot) {
        if let Some(pitch) = snapshot.pitch() {
            self.cell_width = pitch.x;
        }
    }
}

/// Fixed-column grid that reflows in reading order ("Z" flow).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStrategy {
    pub columns: usize,
    /// Distance between neighbouring cell origins on each axis.
    pub cell_size: Vec2,
    /// Horizontal bias toward inserting before the nearest item.
    pub insert_bias: f32,
}

impl GridStrategy {
    pub fn new(columns: usize, cell_size: Vec2, insert_bias: f32) -> Self {
        Self {
            columns: columns.max(1),
            cell_size,
            insert_bias,
        }
    }

    /// Top-left offset of cell `index` relative to cell 0.
    pub fn cell_offset(&self, index: usize) -> Vec2 {
        let row = index / self.columns;
        let col = index % self.columns;
        Vec2::new(col as f32 * self.cell_size.x, row as f32 * self.cell_size.y)
    }
}

impl LayoutStrategy for GridStrategy {
    fn insert_index(&self, pointer: Vec2, snapshot: &LayoutSnapshot) -> usize {
        grid_insert_index(
            pointer,
            snapshot,
            snapshot.len(),
            snapshot.container(),
            self.insert_bias,
        )
    }

    fn displacement(
        &self,
        item_index: usize,
        target_slot: Option<usize>,
        original: Option<usize>,
        active: bool,
    ) -> Vec2 {
        let Some(target_slot) = target_slot.filter(|_| active) else {
            return Vec2::ZERO;
        };
        let shifted = match shift_direction(item_index, target_slot, original) {
            1 => item_index + 1,
            -1 => item_index.saturating_sub(1),
            _ => return Vec2::ZERO,
        };
        self.cell_offset(shifted) - self.cell_offset(item_index)
    }

    fn calibrate(&mut self, snapshot: &LayoutSnapshot) {
        if let Some(pitch) = snapshot.pitch() {
            self.cell_size = pitch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_forward_drag() {
        let strategy = HorizontalStrategy::new(60.0);
        // [A,B,C,D], A (0) into slot 3: B and C slide left.
        let offsets: Vec<f32> = (0..4)
            .map(|i| strategy.displacement(i, Some(3), Some(0), true).x)
            .collect();
        assert_eq!(offsets, [0.0, -60.0, -60.0, 0.0]);
    }

    #[test]
    fn test_horizontal_backward_drag() {
        let strategy = HorizontalStrategy::new(60.0);
        let offsets: Vec<f32> = (0..4)
            .map(|i| strategy.displacement(i, Some(1), Some(3), true).x)
            .collect();
        assert_eq!(offsets, [0.0, 60.0, 60.0, 0.0]);
    }

    #[test]
    fn test_horizontal_noop_slots() {
        let strategy = HorizontalStrategy::new(60.0);
        for slot in [1, 2] {
            for i in 0..4 {
                assert_eq!(strategy.displacement(i, Some(slot), Some(1), true), Vec2::ZERO);
            }
        }
    }

    #[test]
    fn test_horizontal_external_and_inactive() {
        let strategy = HorizontalStrategy::new(60.0);
        assert_eq!(strategy.displacement(0, Some(1), None, true), Vec2::ZERO);
        assert_eq!(strategy.displacement(1, Some(1), None, true), Vec2::new(60.0, 0.0));
        assert_eq!(strategy.displacement(5, Some(1), None, true), Vec2::new(60.0, 0.0));
        assert_eq!(strategy.displacement(1, Some(1), None, false), Vec2::ZERO);
        assert_eq!(strategy.displacement(1, None, Some(0), true), Vec2::ZERO);
    }

    #[test]
    fn test_grid_wraps_rows() {
        let strategy = GridStrategy::new(4, Vec2::new(70.0, 80.0), 10.0);
        // Item 3 (end of row 0) pushed forward lands at start of row 1.
        assert_eq!(
            strategy.displacement(3, Some(0), None, true),
            Vec2::new(-210.0, 80.0)
        );
        // Backward drag from 5 into slot 2: items 2..5 move forward.
        assert_eq!(strategy.displacement(2, Some(2), Some(5), true), Vec2::new(70.0, 0.0));
        assert_eq!(strategy.displacement(4, Some(2), Some(5), true), Vec2::new(70.0, 0.0));
        assert_eq!(strategy.displacement(5, Some(2), Some(5), true), Vec2::ZERO);
        assert_eq!(strategy.displacement(6, Some(2), Some(5), true), Vec2::ZERO);
    }

    #[test]
    fn test_grid_forward_drag_uses_final_cell() {
        let strategy = GridStrategy::new(4, Vec2::new(70.0, 80.0), 10.0);
        // Item 2 into slot 6 ends at index 5: items 3..=5 move back one cell.
        assert_eq!(strategy.displacement(3, Some(6), Some(2), true), Vec2::new(-70.0, 0.0));
        assert_eq!(
            strategy.displacement(4, Some(6), Some(2), true),
            Vec2::new(210.0, -80.0)
        );
        assert_eq!(strategy.displacement(5, Some(6), Some(2), true), Vec2::new(-70.0, 0.0));
        assert_eq!(strategy.displacement(6, Some(6), Some(2), true), Vec2::ZERO);
    }

    #[test]
    fn test_displacement_is_idempotent() {
        let strategies: [Box<dyn LayoutStrategy>; 2] = [
            Box::new(HorizontalStrategy::new(60.0)),
            Box::new(GridStrategy::new(4, Vec2::new(70.0, 80.0), 10.0)),
        ];
        for strategy in &strategies {
            for original in [None, Some(0), Some(3), Some(7)] {
                for slot in 0..=8 {
                    for i in 0..8 {
                        let first = strategy.displacement(i, Some(slot), original, true);
                        let second = strategy.displacement(i, Some(slot), original, true);
                        assert_eq!(first, second);
                    }
                }
            }
        }
    }

    #[test]
    fn test_items_outside_range_stay_put() {
        let grid = GridStrategy::new(4, Vec2::new(70.0, 80.0), 10.0);
        let row = HorizontalStrategy::new(60.0);
        for (original, slot) in [(1usize, 5usize), (6, 2)] {
            let target = final_index(original, slot);
            let (lo, hi) = (original.min(target), original.max(target));
            for i in 0..10 {
                if i < lo || i > hi {
                    assert_eq!(grid.displacement(i, Some(slot), Some(original), true), Vec2::ZERO);
                    assert_eq!(row.displacement(i, Some(slot), Some(original), true), Vec2::ZERO);
                }
            }
        }
    }
}
