//! Fixed geometry standing in for a rendered container.

use springdock::LayoutSource;
use springdock_core::geometry::Rect;
use springdock_core::math::Vec2;

/// Container whose items sit on a regular grid (a row is a grid with one
/// row).
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLayout {
    pub origin: Vec2,
    pub cell: Vec2,
    pub gap: f32,
    pub columns: usize,
    pub count: usize,
    /// Extra space below the last row, inside the container.
    pub bottom_padding: f32,
    /// Report no container rect, as if unmounted.
    pub detached: bool,
}

impl FixedLayout {
    /// `count` cells of `cell` size in one row, `gap` apart, starting at `origin`.
    pub fn row(count: usize, origin: Vec2, cell: f32, gap: f32) -> Self {
        Self {
            origin,
            cell: Vec2::splat(cell),
            gap,
            columns: count.max(1),
            count,
            bottom_padding: 0.0,
            detached: false,
        }
    }

    /// `count` cells in `columns` columns.
    pub fn grid(count: usize, columns: usize, origin: Vec2, cell: f32, gap: f32) -> Self {
        Self {
            origin,
            cell: Vec2::splat(cell),
            gap,
            columns: columns.max(1),
            count,
            bottom_padding: cell,
            detached: false,
        }
    }

    /// Same layout shifted by `offset` (the container moved or scrolled).
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.origin += offset;
        self
    }

    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Rect of cell `index`, whether or not an item occupies it.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let row = index / self.columns;
        let col = index % self.columns;
        let pitch = self.cell + Vec2::splat(self.gap);
        Rect::from_origin_size(
            self.origin + Vec2::new(col as f32 * pitch.x, row as f32 * pitch.y),
            self.cell,
        )
    }

    /// Center of cell `index`.
    pub fn center(&self, index: usize) -> Vec2 {
        self.cell_rect(index).center()
    }

    fn rows(&self) -> usize {
        self.count.div_ceil(self.columns).max(1)
    }
}

impl LayoutSource for FixedLayout {
    fn container_rect(&self) -> Option<Rect> {
        if self.detached {
            return None;
        }
        let pitch = self.cell + Vec2::splat(self.gap);
        let columns = self.columns.min(self.count.max(1));
        let size = Vec2::new(
            columns as f32 * pitch.x - self.gap,
            self.rows() as f32 * pitch.y - self.gap + self.bottom_padding,
        );
        Some(Rect::from_origin_size(self.origin, size))
    }

    fn item_rects(&self) -> Vec<Rect> {
        (0..self.count).map(|index| self.cell_rect(index)).collect()
    }

    fn slot_rect(&self, index: usize) -> Option<Rect> {
        Some(self.cell_rect(index))
    }
}
