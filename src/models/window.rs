//! Window model.
//!
//! A window is a contiguous interval of the major frame during which one
//! partition executes on one core.
//!
//! # Time Model
//! All times are in seconds relative to the start of the major frame.
//! Intervals are half-open: `[start, start + duration)`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{time_eq, TIME_EPSILON};

/// A scheduled window of a partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSchedule {
    /// Window identifier, unique within the owning partition.
    pub window_id: String,
    /// Offset from the start of the major frame (s).
    pub start_seconds: f64,
    /// Length of the window (s). Must be positive.
    pub duration_seconds: f64,
    /// Carried through load/save untouched.
    pub partition_period_start: Option<serde_json::Value>,
}

impl WindowSchedule {
    /// Creates a new window.
    pub fn new(window_id: impl Into<String>, start_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            window_id: window_id.into(),
            start_seconds,
            duration_seconds,
            partition_period_start: None,
        }
    }

    /// Sets the opaque partition period start marker.
    pub fn with_period_start(mut self, value: serde_json::Value) -> Self {
        self.partition_period_start = Some(value);
        self
    }

    /// End of the window (s, exclusive).
    #[inline]
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }

    /// Whether a time point falls inside this window.
    #[inline]
    pub fn contains(&self, time_seconds: f64) -> bool {
        time_seconds >= self.start_seconds && time_seconds < self.end_seconds()
    }

    /// Whether two windows intersect.
    ///
    /// Abutting windows (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_seconds < other.end_seconds() - TIME_EPSILON
            && other.start_seconds < self.end_seconds() - TIME_EPSILON
    }

    /// Whether this window ends exactly where `other` starts.
    pub fn abuts(&self, other: &Self) -> bool {
        time_eq(self.end_seconds(), other.start_seconds)
    }
}

/// Addresses a window by its owning partition and its own id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowRef {
    /// Owning partition.
    pub partition_id: String,
    /// Window within the partition.
    pub window_id: String,
}

impl WindowRef {
    /// Creates a new window reference.
    pub fn new(partition_id: impl Into<String>, window_id: impl Into<String>) -> Self {
        Self {
            partition_id: partition_id.into(),
            window_id: window_id.into(),
        }
    }

    /// Whether this reference points at the given partition/window pair.
    pub fn matches(&self, partition_id: &str, window_id: &str) -> bool {
        self.partition_id == partition_id && self.window_id == window_id
    }
}

impl fmt::Display for WindowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_id, self.window_id)
    }
}
