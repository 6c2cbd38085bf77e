//! Optimized collection types for springdock.
//!
//! Re-exports AHash-backed hash collections.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
