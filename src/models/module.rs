//! Module schedule model and read-only queries.
//!
//! The module schedule is the root value the editor works on: the major
//! frame, the number of cores, and every partition with its windows.
//! Cores are not stored; a core is the set of windows whose assignment
//! maps to its index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CoreIndex, PartitionSchedule, WindowRef, WindowSchedule, TIME_EPSILON};

/// Schedule of an ARINC-653 module over one major frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSchedule {
    /// Display name of the schedule.
    pub schedule_name: String,
    /// Length of the repeating major frame (s, > 0).
    pub major_frame_seconds: f64,
    /// Number of processor cores (>= 1).
    pub required_cores: usize,
    /// Partitions in display order.
    pub partitions: Vec<PartitionSchedule>,
}

/// A window as seen from a core's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreWindow {
    /// Owning partition.
    pub partition_id: String,
    /// Window id within the partition.
    pub window_id: String,
    /// Start offset (s).
    pub start_seconds: f64,
    /// Length (s).
    pub duration_seconds: f64,
}

impl CoreWindow {
    /// End of the window (s, exclusive).
    #[inline]
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }

    /// Reference to the underlying window.
    pub fn window_ref(&self) -> WindowRef {
        WindowRef::new(self.partition_id.clone(), self.window_id.clone())
    }

    /// Whether this window intersects `window` (abutting does not count).
    pub fn overlaps(&self, window: &WindowSchedule) -> bool {
        self.start_seconds < window.end_seconds() - TIME_EPSILON
            && window.start_seconds < self.end_seconds() - TIME_EPSILON
    }
}

/// Which edge of a neighbouring window a boundary is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Start of a neighbour.
    Start,
    /// End of a neighbour.
    End,
}

/// The neighbouring window edge closest to a proposed start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Boundary position (s).
    pub value: f64,
    /// Start or end edge.
    pub kind: BoundaryKind,
}

/// One bar of the flattened timeline view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    /// Partition display name.
    pub content: String,
    /// Core the window runs on.
    pub core: CoreIndex,
    /// Start (s).
    pub start_seconds: f64,
    /// End (s).
    pub end_seconds: f64,
}

impl ModuleSchedule {
    /// Creates an empty schedule with a single core.
    pub fn new(schedule_name: impl Into<String>, major_frame_seconds: f64) -> Self {
        Self {
            schedule_name: schedule_name.into(),
            major_frame_seconds,
            required_cores: 1,
            partitions: Vec::new(),
        }
    }

    /// Sets the number of cores.
    pub fn with_required_cores(mut self, required_cores: usize) -> Self {
        self.required_cores = required_cores;
        self
    }

    /// Adds a partition.
    pub fn with_partition(mut self, partition: PartitionSchedule) -> Self {
        self.partitions.push(partition);
        self
    }

    /// Finds a partition by id.
    pub fn partition(&self, partition_id: &str) -> Option<&PartitionSchedule> {
        self.partitions
            .iter()
            .find(|p| p.partition_id == partition_id)
    }

    pub(crate) fn partition_mut(&mut self, partition_id: &str) -> Option<&mut PartitionSchedule> {
        self.partitions
            .iter_mut()
            .find(|p| p.partition_id == partition_id)
    }

    /// Finds a window by reference.
    pub fn window(&self, window: &WindowRef) -> Option<&WindowSchedule> {
        self.partition(&window.partition_id)?
            .window(&window.window_id)
    }

    /// Core a window runs on, or `None` if the window does not exist.
    pub fn core_of(&self, window: &WindowRef) -> Option<CoreIndex> {
        let partition = self.partition(&window.partition_id)?;
        partition.window(&window.window_id)?;
        Some(partition.core_of(&window.window_id))
    }

    /// Total number of windows across all partitions.
    pub fn window_count(&self) -> usize {
        self.partitions.iter().map(|p| p.windows.len()).sum()
    }

    /// Windows assigned to `core`, ordered by start.
    ///
    /// Ties on start keep partition display order.
    pub fn windows_on_core(&self, core: CoreIndex) -> Vec<CoreWindow> {
        let mut windows: Vec<CoreWindow> = self
            .partitions
            .iter()
            .flat_map(|p| {
                p.windows
                    .iter()
                    .filter(move |w| p.core_of(&w.window_id) == core)
                    .map(move |w| CoreWindow {
                        partition_id: p.partition_id.clone(),
                        window_id: w.window_id.clone(),
                        start_seconds: w.start_seconds,
                        duration_seconds: w.duration_seconds,
                    })
            })
            .collect();
        windows.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        windows
    }

    /// Windows of one partition ordered by start, or `None` for an unknown partition.
    pub fn windows_of_partition(&self, partition_id: &str) -> Option<Vec<&WindowSchedule>> {
        self.partition(partition_id).map(|p| p.windows_by_start())
    }

    /// Sum of the durations of windows on `core` (s).
    pub fn total_duration_on_core(&self, core: CoreIndex) -> f64 {
        self.windows_on_core(core)
            .iter()
            .map(|w| w.duration_seconds)
            .sum()
    }

    /// Frame time on `core` not taken by windows other than `exclude` (s).
    ///
    /// This is the largest duration `exclude` could grow to if the core's
    /// windows were packed without gaps.
    pub fn remaining_time_on_core(&self, core: CoreIndex, exclude: Option<&WindowRef>) -> f64 {
        let used: f64 = self
            .windows_on_core(core)
            .iter()
            .filter(|w| exclude.map_or(true, |e| !e.matches(&w.partition_id, &w.window_id)))
            .map(|w| w.duration_seconds)
            .sum();
        self.major_frame_seconds - used
    }

    /// Windows grouped by the core they run on, each list ordered by start.
    ///
    /// Built in one pass over the partitions. Only cores holding at least
    /// one window appear, including indices left out of range by a core
    /// removal. Ties on start keep partition display order.
    pub fn windows_by_core(&self) -> BTreeMap<CoreIndex, Vec<CoreWindow>> {
        let mut cores: BTreeMap<CoreIndex, Vec<CoreWindow>> = BTreeMap::new();
        for p in &self.partitions {
            for w in &p.windows {
                cores
                    .entry(p.core_of(&w.window_id))
                    .or_default()
                    .push(CoreWindow {
                        partition_id: p.partition_id.clone(),
                        window_id: w.window_id.clone(),
                        start_seconds: w.start_seconds,
                        duration_seconds: w.duration_seconds,
                    });
            }
        }
        for windows in cores.values_mut() {
            windows.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        }
        cores
    }

    /// Closest start or end edge of another window on `core`.
    ///
    /// Every window on `core` except `exclude` contributes its start and
    /// its end. Returns the edge nearest to `proposed_start`; on ties the
    /// earliest window wins, start before end. `None` when the core holds
    /// no other window.
    pub fn find_closest_boundary(
        &self,
        core: CoreIndex,
        proposed_start: f64,
        exclude: Option<&WindowRef>,
    ) -> Option<Boundary> {
        let mut best: Option<(f64, Boundary)> = None;

        for w in self.windows_on_core(core) {
            if exclude.is_some_and(|e| e.matches(&w.partition_id, &w.window_id)) {
                continue;
            }
            for boundary in [
                Boundary {
                    value: w.start_seconds,
                    kind: BoundaryKind::Start,
                },
                Boundary {
                    value: w.end_seconds(),
                    kind: BoundaryKind::End,
                },
            ] {
                let distance = (proposed_start - boundary.value).abs();
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, boundary));
                }
            }
        }

        best.map(|(_, boundary)| boundary)
    }

    /// Flattened timeline of every window, ordered by start.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let mut entries: Vec<TimelineEntry> = self
            .partitions
            .iter()
            .flat_map(|p| {
                p.windows.iter().map(move |w| TimelineEntry {
                    content: p.partition_name.clone(),
                    core: p.core_of(&w.window_id),
                    start_seconds: w.start_seconds,
                    end_seconds: w.end_seconds(),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> ModuleSchedule {
        ModuleSchedule::new("Main", 10.0)
            .with_required_cores(2)
            .with_partition(
                PartitionSchedule::new("P1")
                    .with_name("Nav")
                    .with_window(WindowSchedule::new("W1", 0.0, 2.0))
                    .with_window_on_core(WindowSchedule::new("W2", 1.0, 3.0), 1),
            )
            .with_partition(
                PartitionSchedule::new("P2")
                    .with_name("Comms")
                    .with_window(WindowSchedule::new("W1", 5.0, 1.5)),
            )
    }

    #[test]
    fn test_windows_on_core() {
        let s = sample_schedule();
        let core0 = s.windows_on_core(0);
        assert_eq!(core0.len(), 2);
        assert_eq!(core0[0].partition_id, "P1");
        assert_eq!(core0[1].partition_id, "P2");
        assert!((core0[1].end_seconds() - 6.5).abs() < 1e-10);

        let core1 = s.windows_on_core(1);
        assert_eq!(core1.len(), 1);
        assert_eq!(core1[0].window_id, "W2");

        assert!(s.windows_on_core(5).is_empty());
    }

    #[test]
    fn test_total_duration_on_core() {
        let s = sample_schedule();
        assert!((s.total_duration_on_core(0) - 3.5).abs() < 1e-10);
        assert!((s.total_duration_on_core(1) - 3.0).abs() < 1e-10);
        assert!((s.total_duration_on_core(2) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_remaining_time_on_core() {
        let s = sample_schedule();
        let w = WindowRef::new("P2", "W1");
        assert!((s.remaining_time_on_core(0, Some(&w)) - 8.0).abs() < 1e-10);
        assert!((s.remaining_time_on_core(0, None) - 6.5).abs() < 1e-10);
    }

    #[test]
    fn test_core_of() {
        let s = sample_schedule();
        assert_eq!(s.core_of(&WindowRef::new("P1", "W2")), Some(1));
        assert_eq!(s.core_of(&WindowRef::new("P2", "W1")), Some(0));
        assert_eq!(s.core_of(&WindowRef::new("P2", "W9")), None);
    }

    #[test]
    fn test_find_closest_boundary() {
        let s = sample_schedule();
        let moving = WindowRef::new("P1", "W1");

        // Only P2/W1 remains on core 0: edges at 5.0 and 6.5.
        let b = s.find_closest_boundary(0, 4.8, Some(&moving)).unwrap();
        assert_eq!(b.kind, BoundaryKind::Start);
        assert!((b.value - 5.0).abs() < 1e-10);

        let b = s.find_closest_boundary(0, 6.0, Some(&moving)).unwrap();
        assert_eq!(b.kind, BoundaryKind::End);
        assert!((b.value - 6.5).abs() < 1e-10);
    }

    #[test]
    fn test_find_closest_boundary_empty_core() {
        let s = sample_schedule();
        let moving = WindowRef::new("P1", "W2");
        assert!(s.find_closest_boundary(1, 0.0, Some(&moving)).is_none());
    }

    #[test]
    fn test_windows_by_core() {
        let s = sample_schedule();
        let by_core = s.windows_by_core();
        assert_eq!(by_core.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(by_core[&0], s.windows_on_core(0));
        assert_eq!(by_core[&1][0].window_id, "W2");
    }

    #[test]
    fn test_windows_by_core_skips_empty_and_keeps_stale() {
        let mut s = sample_schedule().with_required_cores(8);
        assert_eq!(s.windows_by_core().len(), 2);
        s.required_cores = 1;
        assert!(s.windows_by_core().contains_key(&1));
    }

    #[test]
    fn test_timeline() {
        let s = sample_schedule();
        let t = s.timeline();
        assert_eq!(t.len(), 3);
        assert_eq!(t[0].content, "Nav");
        assert!((t[1].start_seconds - 1.0).abs() < 1e-10);
        assert_eq!(t[1].core, 1);
        assert_eq!(t[2].content, "Comms");
        assert!((t[2].end_seconds - 6.5).abs() < 1e-10);
    }

    #[test]
    fn test_windows_of_partition() {
        let s = sample_schedule();
        let ws = s.windows_of_partition("P1").unwrap();
        assert_eq!(ws.len(), 2);
        assert!(s.windows_of_partition("nope").is_none());
        assert_eq!(s.window_count(), 3);
    }
}
