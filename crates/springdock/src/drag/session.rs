//! Per-gesture drag state.

use springdock_core::math::Vec2;

use crate::model::DockItem;

/// Lifecycle phase of a container's drag machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down on an item but has not moved past the threshold.
    Pressed,
    Dragging,
    /// Released; the ghost is flying to its landing spot.
    AnimatingReturn,
}

/// What a release commits once the return flight lands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PendingAction {
    Reorder { new_list: Vec<DockItem> },
    DropToFolder { target: DockItem },
    MergeIntoApp { target: DockItem },
    DragOut { position: Vec2 },
    DragToOpenFolder,
    #[default]
    None,
}

impl PendingAction {
    pub fn is_none(&self) -> bool {
        matches!(self, PendingAction::None)
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            PendingAction::Reorder { .. } => "reorder",
            PendingAction::DropToFolder { .. } => "drop-to-folder",
            PendingAction::MergeIntoApp { .. } => "merge-into-app",
            PendingAction::DragOut { .. } => "drag-out",
            PendingAction::DragToOpenFolder => "drag-to-open-folder",
            PendingAction::None => "none",
        }
    }
}

/// State of one pointer gesture, owned by exactly one container.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Copy of the item taken at press time.
    pub item: DockItem,
    /// Source index, or `None` for an item from another container.
    pub original_index: Option<usize>,
    pub press_position: Vec2,
    pub pointer_position: Vec2,
    /// Pointer minus the item's top-left at press time.
    pub grab_offset: Vec2,
    pub placeholder_index: Option<usize>,
    pub pending_action: PendingAction,
    pub target_position: Option<Vec2>,
    /// Snapshot index of the neighbor the pointer dwells on once pre-merge
    /// is active.
    pub merge_target: Option<usize>,
    /// Folder already opened by dwelling during this gesture.
    pub hover_opened: Option<String>,
    /// Last pointer move was claimed by another container.
    pub suppressed: bool,
}

impl DragSession {
    pub fn new(item: DockItem, original_index: Option<usize>, press: Vec2, item_origin: Vec2) -> Self {
        Self {
            item,
            original_index,
            press_position: press,
            pointer_position: press,
            grab_offset: press - item_origin,
            placeholder_index: None,
            pending_action: PendingAction::None,
            target_position: None,
            merge_target: None,
            hover_opened: None,
            suppressed: false,
        }
    }

    /// Whether the pointer has travelled strictly further than `threshold`.
    pub fn exceeds_threshold(&self, threshold: f32) -> bool {
        self.pointer_position.distance(self.press_position) > threshold
    }

    /// Where the ghost's top-left sits for the current pointer.
    pub fn ghost_position(&self) -> Vec2 {
        self.pointer_position - self.grab_offset
    }

    pub fn is_dwelling(&self) -> bool {
        self.merge_target.is_some()
    }

    /// Forget placeholder, merge and drag-out state.
    pub fn clear_targets(&mut self) {
        self.placeholder_index = None;
        self.merge_target = None;
        self.pending_action = PendingAction::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let mut session = DragSession::new(
            DockItem::app("a", "A"),
            Some(0),
            Vec2::new(100.0, 100.0),
            Vec2::new(90.0, 80.0),
        );
        assert_eq!(session.grab_offset, Vec2::new(10.0, 20.0));
        session.pointer_position = Vec2::new(108.0, 100.0);
        assert!(!session.exceeds_threshold(8.0));
        session.pointer_position = Vec2::new(108.5, 100.0);
        assert!(session.exceeds_threshold(8.0));
        assert_eq!(session.ghost_position(), Vec2::new(98.5, 80.0));
    }

    #[test]
    fn test_clear_targets() {
        let mut session =
            DragSession::new(DockItem::app("a", "A"), Some(0), Vec2::ZERO, Vec2::ZERO);
        session.placeholder_index = Some(2);
        session.merge_target = Some(1);
        session.pending_action = PendingAction::DragOut {
            position: Vec2::ONE,
        };
        session.clear_targets();
        assert!(session.placeholder_index.is_none());
        assert!(!session.is_dwelling());
        assert!(session.pending_action.is_none());
    }
}
