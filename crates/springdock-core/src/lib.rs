//! Springdock Core
//!
//! Shared building blocks for the springdock drag-and-drop engine: math
//! re-exports, the [`geometry::Rect`] primitive, fast collections, logging
//! and profiling hooks.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
