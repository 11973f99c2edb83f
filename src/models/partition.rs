//! Partition model.
//!
//! A partition is a workload unit that receives one or more windows per
//! major frame. Each window is pinned to a core through the partition's
//! core assignment map; windows without an entry run on core 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CoreIndex, WindowSchedule, DEFAULT_CORE};

/// A partition and its windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSchedule {
    /// Partition identifier, unique within the module.
    pub partition_id: String,
    /// Human-readable name.
    pub partition_name: String,
    /// Activation period (s).
    pub period_seconds: f64,
    /// Execution budget per period (s).
    pub period_duration_seconds: f64,
    /// Windows of this partition (ids unique within the partition).
    pub windows: Vec<WindowSchedule>,
    /// Window id → core index. Missing entries mean [`DEFAULT_CORE`].
    pub window_core_assignments: BTreeMap<String, CoreIndex>,
}

impl PartitionSchedule {
    /// Creates an empty partition.
    pub fn new(partition_id: impl Into<String>) -> Self {
        Self {
            partition_id: partition_id.into(),
            partition_name: String::new(),
            period_seconds: 0.0,
            period_duration_seconds: 0.0,
            windows: Vec::new(),
            window_core_assignments: BTreeMap::new(),
        }
    }

    /// Sets the partition name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.partition_name = name.into();
        self
    }

    /// Sets period and period duration.
    pub fn with_period(mut self, period_seconds: f64, period_duration_seconds: f64) -> Self {
        self.period_seconds = period_seconds;
        self.period_duration_seconds = period_duration_seconds;
        self
    }

    /// Adds a window with no explicit core assignment.
    pub fn with_window(mut self, window: WindowSchedule) -> Self {
        self.windows.push(window);
        self
    }

    /// Adds a window pinned to `core`.
    pub fn with_window_on_core(mut self, window: WindowSchedule, core: CoreIndex) -> Self {
        self.window_core_assignments
            .insert(window.window_id.clone(), core);
        self.windows.push(window);
        self
    }

    /// Finds a window by id.
    pub fn window(&self, window_id: &str) -> Option<&WindowSchedule> {
        self.windows.iter().find(|w| w.window_id == window_id)
    }

    pub(crate) fn window_mut(&mut self, window_id: &str) -> Option<&mut WindowSchedule> {
        self.windows.iter_mut().find(|w| w.window_id == window_id)
    }

    /// Core the window runs on (core 0 when unassigned).
    pub fn core_of(&self, window_id: &str) -> CoreIndex {
        self.window_core_assignments
            .get(window_id)
            .copied()
            .unwrap_or(DEFAULT_CORE)
    }

    /// Windows ordered by start time.
    pub fn windows_by_start(&self) -> Vec<&WindowSchedule> {
        let mut windows: Vec<&WindowSchedule> = self.windows.iter().collect();
        windows.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        windows
    }

    /// Sum of all window durations (s).
    pub fn total_window_duration(&self) -> f64 {
        self.windows.iter().map(|w| w.duration_seconds).sum()
    }

    /// Whether a window id is already taken.
    pub fn has_window(&self, window_id: &str) -> bool {
        self.window(window_id).is_some()
    }

    /// Generates a window id derived from `base` that no window uses yet.
    ///
    /// Tries `{base}_1`, `{base}_2`, ... and returns the first free one.
    pub fn fresh_window_id(&self, base: &str) -> String {
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| {
                !self.has_window(candidate) && !self.window_core_assignments.contains_key(candidate)
            })
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_partition() -> PartitionSchedule {
        PartitionSchedule::new("P1")
            .with_name("Flight Control")
            .with_period(10.0, 3.0)
            .with_window(WindowSchedule::new("W1", 5.0, 1.0))
            .with_window_on_core(WindowSchedule::new("W2", 0.0, 2.0), 1)
    }

    #[test]
    fn test_partition_builder() {
        let p = sample_partition();
        assert_eq!(p.partition_id, "P1");
        assert_eq!(p.partition_name, "Flight Control");
        assert!((p.period_seconds - 10.0).abs() < 1e-10);
        assert!((p.period_duration_seconds - 3.0).abs() < 1e-10);
        assert_eq!(p.windows.len(), 2);
    }

    #[test]
    fn test_core_defaults_to_zero() {
        let p = sample_partition();
        assert_eq!(p.core_of("W1"), 0);
        assert_eq!(p.core_of("W2"), 1);
        assert_eq!(p.core_of("missing"), 0);
    }

    #[test]
    fn test_windows_by_start() {
        let p = sample_partition();
        let ids: Vec<&str> = p
            .windows_by_start()
            .iter()
            .map(|w| w.window_id.as_str())
            .collect();
        assert_eq!(ids, vec!["W2", "W1"]);
    }

    #[test]
    fn test_total_window_duration() {
        let p = sample_partition();
        assert!((p.total_window_duration() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_fresh_window_id() {
        let p = sample_partition().with_window(WindowSchedule::new("W1_1", 7.0, 1.0));
        assert_eq!(p.fresh_window_id("W1"), "W1_2");
        assert_eq!(p.fresh_window_id("W2"), "W2_1");
    }
}
