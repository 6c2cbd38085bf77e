//! Which container claims the pointer.

use springdock_core::geometry::Rect;
use springdock_core::math::Vec2;

use crate::layout::point_in_rect;

/// Container under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The open folder view.
    Folder,
    Dock,
    Outside,
}

/// Classify `pointer` against the dock and the open folder view.
///
/// The folder view wins over the dock, except when the dragged item is a
/// folder: folders never drop into folders, so the folder view is ignored.
/// Missing rects never match.
pub fn detect_region(
    pointer: Vec2,
    dock_rect: Option<&Rect>,
    folder_rect: Option<&Rect>,
    dragged_is_folder: bool,
    buffer: f32,
) -> Region {
    if !dragged_is_folder
        && let Some(folder) = folder_rect
        && point_in_rect(pointer, folder, 0.0)
    {
        return Region::Folder;
    }
    if let Some(dock) = dock_rect
        && point_in_rect(pointer, dock, buffer)
    {
        return Region::Dock;
    }
    Region::Outside
}
