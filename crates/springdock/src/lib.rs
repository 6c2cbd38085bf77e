//! Springdock - drag-and-drop engine for icon docks with folders
//!
//! This crate drives a dock of app icons and single-level folders:
//! - Two-level item tree with automatic folder dissolution
//! - Snapshot-based insertion and squeeze math for rows and grids
//! - Drag state machine with threshold, dwell-to-merge and hover-to-open
//! - Spring-animated return flights that commit only after landing
//! - Coordination between the dock and an open folder view
//!
//! Rendering is left to the embedding application. It supplies geometry via
//! [`LayoutSource`], moves the ghost via [`PositionHandle`], and feeds
//! pointer events and animation frames in.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use std::time::Instant;
//! # use springdock::{DockCoordinator, DockItem, DockModel, DockSurfaces, DragConfig};
//! # use springdock::{DetachedHandle, LayoutSource};
//! # use springdock_input::{PointerEvent, TimedPointerEvent};
//! # fn run(dock_layout: &dyn LayoutSource) {
//! let model = DockModel::new(vec![
//!     DockItem::app("mail", "Mail"),
//!     DockItem::app("maps", "Maps"),
//! ]);
//! let mut dock = DockCoordinator::new(model, DragConfig::default());
//! let mut ghost = DetachedHandle;
//! dock.set_edit_mode(true, &mut ghost);
//!
//! let mut surfaces = DockSurfaces {
//!     dock: dock_layout,
//!     folder: None,
//!     ghost: &mut ghost,
//! };
//! let event = PointerEvent::Move { position: [10.0, 10.0].into() };
//! dock.handle_pointer(TimedPointerEvent::new(event, Instant::now()), &mut surfaces);
//!
//! for event in dock.drain_events() {
//!     // persist, re-render, navigate...
//!     let _ = event;
//! }
//! # }
//! ```

pub mod callbacks;
pub mod config;
pub mod coordinator;
pub mod drag;
pub mod error;
pub mod layout;
pub mod model;

pub use callbacks::{DragCallbacks, NoopCallbacks};
pub use config::{ContainerCaps, DragConfig};
pub use coordinator::{DockCoordinator, DockEvent, DockSurfaces, SharedDragState};
pub use drag::{
    DetachedHandle, DragEnv, DragMachine, DragPhase, DragSession, PendingAction, PositionHandle,
    Region, ReleaseHints, ReleaseOutcome, ReturnFlight, detect_region,
};
pub use error::{DockError, DockResult};
pub use layout::{
    GridStrategy, HorizontalStrategy, LayoutSnapshot, LayoutSource, LayoutStrategy, SnapshotEntry,
};
pub use model::{DockItem, DockModel, FolderChange, ItemKind, KeyValueStore, MemoryStore};
