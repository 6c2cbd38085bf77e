//! Geometry utilities, layout snapshots and container layout strategies.

pub mod geometry;
pub mod snapshot;
pub mod strategy;

pub use geometry::{
    ClosestItem, closest_item, distance, grid_insert_index, linear_insert_index, point_in_rect,
};
pub use snapshot::{LayoutSnapshot, LayoutSource, SnapshotEntry};
pub use strategy::{GridStrategy, HorizontalStrategy, LayoutStrategy};
