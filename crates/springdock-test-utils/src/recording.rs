//! Recording implementations of the engine's callback and ghost traits.

use std::sync::Arc;

use parking_lot::Mutex;
use springdock::{DockItem, DragCallbacks, PositionHandle};
use springdock_core::math::Vec2;

/// One recorded callback, with items reduced to their ids.
#[derive(Debug, Clone, PartialEq)]
pub enum DragCall {
    DragStart(String),
    DragEnd,
    Click(String),
    Reorder(Vec<String>),
    DropToFolder { item: String, folder: String },
    MergeFolder { item: String, target: String },
    DragToOpenFolder(String),
    DragOut { item: String, position: Vec2 },
    HoverOpenFolder { item: String, folder: String },
}

/// Records every callback in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallbacks {
    calls: Arc<Mutex<Vec<DragCall>>>,
}

impl RecordingCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far.
    pub fn calls(&self) -> Vec<DragCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Number of drag starts recorded.
    pub fn count_drag_starts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DragCall::DragStart(_)))
            .count()
    }

    /// Calls other than drag start and drag end.
    pub fn commits(&self) -> Vec<DragCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| !matches!(call, DragCall::DragStart(_) | DragCall::DragEnd))
            .cloned()
            .collect()
    }

    fn record(&self, call: DragCall) {
        self.calls.lock().push(call);
    }
}

impl DragCallbacks for RecordingCallbacks {
    fn on_drag_start(&mut self, item: &DockItem) {
        self.record(DragCall::DragStart(item.id.clone()));
    }

    fn on_drag_end(&mut self) {
        self.record(DragCall::DragEnd);
    }

    fn on_click(&mut self, item: &DockItem) {
        self.record(DragCall::Click(item.id.clone()));
    }

    fn on_reorder(&mut self, new_list: Vec<DockItem>) {
        self.record(DragCall::Reorder(crate::ids(&new_list)));
    }

    fn on_drop_to_folder(&mut self, item: &DockItem, folder: &DockItem) {
        self.record(DragCall::DropToFolder {
            item: item.id.clone(),
            folder: folder.id.clone(),
        });
    }

    fn on_merge_folder(&mut self, item: &DockItem, target: &DockItem) {
        self.record(DragCall::MergeFolder {
            item: item.id.clone(),
            target: target.id.clone(),
        });
    }

    fn on_drag_to_open_folder(&mut self, item: &DockItem) {
        self.record(DragCall::DragToOpenFolder(item.id.clone()));
    }

    fn on_drag_out(&mut self, item: &DockItem, position: Vec2) {
        self.record(DragCall::DragOut {
            item: item.id.clone(),
            position,
        });
    }

    fn on_hover_open_folder(&mut self, item: &DockItem, folder: &DockItem) {
        self.record(DragCall::HoverOpenFolder {
            item: item.id.clone(),
            folder: folder.id.clone(),
        });
    }
}

/// Records every position written to the ghost.
#[derive(Debug, Clone, Default)]
pub struct RecordingGhost {
    positions: Arc<Mutex<Vec<Vec2>>>,
}

impl RecordingGhost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.positions.lock().clone()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.positions.lock().last().copied()
    }

    pub fn count(&self) -> usize {
        self.positions.lock().len()
    }
}

impl PositionHandle for RecordingGhost {
    fn set_position(&mut self, position: Vec2) {
        self.positions.lock().push(position);
    }
}
