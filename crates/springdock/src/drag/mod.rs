//! Drag sessions: lifecycle, dwell timing, region classification and the
//! return flight.

pub mod animation;
pub mod dwell;
pub mod machine;
pub mod region;
pub mod session;

pub use animation::{DetachedHandle, PositionHandle, ReturnFlight};
pub use dwell::DwellTracker;
pub use machine::{DragEnv, DragMachine, ReleaseHints, ReleaseOutcome};
pub use region::{Region, detect_region};
pub use session::{DragPhase, DragSession, PendingAction};
