//! Drag tuning and per-container capabilities.

use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::DockResult;

/// Movement (px) a press must exceed before it becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 8.0;
/// Center distance (px) under which a neighbor becomes a merge candidate.
pub const DEFAULT_MERGE_DISTANCE: f32 = 30.0;
pub const DEFAULT_PRE_MERGE_DELAY_MS: u64 = 300;
pub const DEFAULT_HOVER_OPEN_DELAY_MS: u64 = 500;

bitflags! {
    /// Behaviours a container's drag machine enables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContainerCaps: u8 {
        /// Dwelling on a neighbor merges into it on release.
        const MERGE = 1 << 0;
        /// Dwelling on a folder opens it and hands the drag over.
        const HOVER_OPEN = 1 << 1;
        /// Leaving the buffered bounds arms a drag-out.
        const DRAG_OUT = 1 << 2;
    }
}

impl ContainerCaps {
    /// The horizontal dock row.
    pub const DOCK: Self = Self::MERGE.union(Self::HOVER_OPEN);
    /// An open folder grid.
    pub const FOLDER: Self = Self::DRAG_OUT;
}

/// Every tunable of the drag engine.
///
/// Distances are in viewport pixels. Missing fields take their defaults when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub drag_threshold: f32,
    pub merge_distance: f32,
    pub pre_merge_delay_ms: u64,
    pub hover_open_delay_ms: u64,
    /// Horizontal bias toward "insert before" in grid layouts.
    pub grid_insert_bias: f32,
    /// Outward buffer around the dock when classifying the pointer's region.
    /// The folder view is always tested without one.
    pub region_buffer: f32,
    /// Buffer around the dock before the pointer counts as outside it.
    pub dock_buffer: f32,
    /// Buffer around an open folder before a drag-out arms.
    pub folder_buffer: f32,
    pub folder_columns: usize,
    /// Fallback completing a return flight whose transition never ends.
    pub return_timeout_ms: u64,
    pub stiffness: f32,
    pub damping: f32,
    /// Distance (px) at which a settled flight snaps to its target.
    pub rest_distance: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            pre_merge_delay_ms: DEFAULT_PRE_MERGE_DELAY_MS,
            hover_open_delay_ms: DEFAULT_HOVER_OPEN_DELAY_MS,
            grid_insert_bias: 10.0,
            region_buffer: 100.0,
            dock_buffer: 100.0,
            folder_buffer: 60.0,
            folder_columns: 4,
            return_timeout_ms: 450,
            stiffness: 320.0,
            damping: 32.0,
            rest_distance: 0.5,
        }
    }
}

impl DragConfig {
    /// Parse a (possibly partial) JSON document and sanitise it.
    pub fn from_json(json: &str) -> DockResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp values into usable ranges.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let non_negative = |value: f32, fallback: f32| {
            if value.is_finite() { value.max(0.0) } else { fallback }
        };
        self.drag_threshold = non_negative(self.drag_threshold, defaults.drag_threshold);
        self.merge_distance = non_negative(self.merge_distance, defaults.merge_distance);
        self.grid_insert_bias = non_negative(self.grid_insert_bias, defaults.grid_insert_bias);
        self.region_buffer = non_negative(self.region_buffer, defaults.region_buffer);
        self.dock_buffer = non_negative(self.dock_buffer, defaults.dock_buffer);
        self.folder_buffer = non_negative(self.folder_buffer, defaults.folder_buffer);
        self.rest_distance = non_negative(self.rest_distance, defaults.rest_distance);
        self.folder_columns = self.folder_columns.max(1);
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            self.stiffness = defaults.stiffness;
        }
        self.damping = non_negative(self.damping, defaults.damping);
        if self.hover_open_delay_ms < self.pre_merge_delay_ms {
            tracing::warn!(
                pre_merge = self.pre_merge_delay_ms,
                hover_open = self.hover_open_delay_ms,
                "hover-open delay shorter than pre-merge delay"
            );
        }
        self
    }

    pub fn pre_merge_delay(&self) -> Duration {
        Duration::from_millis(self.pre_merge_delay_ms)
    }

    pub fn hover_open_delay(&self) -> Duration {
        Duration::from_millis(self.hover_open_delay_ms)
    }

    pub fn return_timeout(&self) -> Duration {
        Duration::from_millis(self.return_timeout_ms)
    }

    /// Set the drag start threshold.
    pub fn drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Set the merge candidate distance.
    pub fn merge_distance(mut self, distance: f32) -> Self {
        self.merge_distance = distance;
        self
    }

    /// Set both dwell delays.
    pub fn dwell_delays(mut self, pre_merge: Duration, hover_open: Duration) -> Self {
        self.pre_merge_delay_ms = pre_merge.as_millis() as u64;
        self.hover_open_delay_ms = hover_open.as_millis() as u64;
        self
    }

    /// Set the dock and folder buffers.
    pub fn buffers(mut self, dock: f32, folder: f32) -> Self {
        self.dock_buffer = dock;
        self.folder_buffer = folder;
        self
    }

    /// Set the folder grid column count.
    pub fn folder_columns(mut self, columns: usize) -> Self {
        self.folder_columns = columns;
        self
    }

    /// Set the return flight spring.
    pub fn spring(mut self, stiffness: f32, damping: f32) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    /// Set the return flight timeout.
    pub fn flight_timeout(mut self, timeout: Duration) -> Self {
        self.return_timeout_ms = timeout.as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gesture_constants() {
        let config = DragConfig::default();
        assert_eq!(config.drag_threshold, 8.0);
        assert_eq!(config.merge_distance, 30.0);
        assert_eq!(config.pre_merge_delay(), Duration::from_millis(300));
        assert_eq!(config.hover_open_delay(), Duration::from_millis(500));
        assert_eq!(config.folder_columns, 4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DragConfig::from_json(r#"{ "merge_distance": 40.0 }"#).unwrap();
        assert_eq!(config.merge_distance, 40.0);
        assert_eq!(config.drag_threshold, DEFAULT_DRAG_THRESHOLD);
    }

    #[test]
    fn test_sanitizes_out_of_range_values() {
        let config =
            DragConfig::from_json(r#"{ "drag_threshold": -3.0, "folder_columns": 0 }"#).unwrap();
        assert_eq!(config.drag_threshold, 0.0);
        assert_eq!(config.folder_columns, 1);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(DragConfig::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_caps_presets() {
        assert!(ContainerCaps::DOCK.contains(ContainerCaps::MERGE | ContainerCaps::HOVER_OPEN));
        assert!(!ContainerCaps::DOCK.contains(ContainerCaps::DRAG_OUT));
        assert_eq!(ContainerCaps::FOLDER, ContainerCaps::DRAG_OUT);
    }
}
