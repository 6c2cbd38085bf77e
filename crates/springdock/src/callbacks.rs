//! Commit-time notifications from a drag machine.

use springdock_core::math::Vec2;

use crate::model::DockItem;

/// Receiver for drag lifecycle and commit notifications.
///
/// Commit callbacks fire at most once per gesture, after the machine has
/// already returned to idle. Every method defaults to doing nothing.
pub trait DragCallbacks {
    /// The press crossed the movement threshold.
    fn on_drag_start(&mut self, _item: &DockItem) {}

    /// The gesture finished, committed or cancelled.
    fn on_drag_end(&mut self) {}

    /// Released without crossing the movement threshold.
    fn on_click(&mut self, _item: &DockItem) {}

    fn on_reorder(&mut self, _new_list: Vec<DockItem>) {}

    fn on_drop_to_folder(&mut self, _item: &DockItem, _folder: &DockItem) {}

    /// App dropped on app; the receiver creates the folder.
    fn on_merge_folder(&mut self, _item: &DockItem, _target: &DockItem) {}

    fn on_drag_to_open_folder(&mut self, _item: &DockItem) {}

    fn on_drag_out(&mut self, _item: &DockItem, _position: Vec2) {}

    /// Dwelling on a folder opened it. Fires mid-gesture.
    fn on_hover_open_folder(&mut self, _item: &DockItem, _folder: &DockItem) {}
}

/// Callbacks that ignore everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl DragCallbacks for NoopCallbacks {}
