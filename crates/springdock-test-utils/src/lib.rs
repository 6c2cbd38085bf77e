//! Test utilities for springdock.
//!
//! Recording mocks for the engine's collaborator traits and fixed layouts
//! that stand in for a rendering layer.
//!
//! - [`RecordingCallbacks`] - records every [`DragCallbacks`](springdock::DragCallbacks) call
//! - [`RecordingGhost`] - records every ghost position
//! - [`FixedLayout`] - row and grid geometry with no renderer behind it
//!
//! Recorders share their log through `Arc<Mutex<..>>`, so a clone can be
//! handed to the engine while the test keeps the original for assertions.
//!
//! # Example
//!
//! ```rust
//! use springdock::{DockItem, DragCallbacks};
//! use springdock_test_utils::{DragCall, RecordingCallbacks};
//!
//! let recorder = RecordingCallbacks::new();
//! let mut handle = recorder.clone();
//! handle.on_click(&DockItem::app("mail", "Mail"));
//!
//! assert_eq!(recorder.calls(), vec![DragCall::Click("mail".into())]);
//! ```

pub mod layout;
pub mod recording;

pub use layout::FixedLayout;
pub use recording::{DragCall, RecordingCallbacks, RecordingGhost};

use springdock::DockItem;

/// Apps with the given ids (names equal ids).
pub fn apps(ids: &[&str]) -> Vec<DockItem> {
    ids.iter().map(|id| DockItem::app(*id, *id)).collect()
}

/// Ids of `items`, in order.
pub fn ids(items: &[DockItem]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}
