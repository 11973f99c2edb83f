//! Drag snapping.
//!
//! While a window is dragged, its proposed start is pulled onto the
//! nearest edge of another window on the same core when close enough,
//! so that exact abutment is easy to reach.
//!
//! # Algorithm
//!
//! 1. Find the closest neighbouring edge to the proposed start
//!    ([`ModuleSchedule::find_closest_boundary`]), ignoring the moving window.
//! 2. `threshold = threshold_ratio * major_frame`.
//! 3. Start edge within threshold → place the moving window so that its
//!    end touches that start (`edge - duration`), if that is not negative.
//! 4. End edge within threshold → start at that end.
//! 5. Otherwise keep the proposed start.
//!
//! The result is always rounded to four decimals. Snapping never
//! validates; callers re-check frame bounds and overlaps afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{round_time, BoundaryKind, CoreIndex, ModuleSchedule, WindowRef};

/// Default snap distance as a fraction of the major frame.
pub const DEFAULT_SNAP_THRESHOLD_RATIO: f64 = 0.03;

/// What the snapper did with a proposed start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SnapOutcome {
    /// End of the moving window aligned to a neighbour's start.
    EndToStart,
    /// Start of the moving window aligned to a neighbour's end.
    StartToEnd,
    /// Proposed start kept (rounded).
    Unchanged,
}

/// Snapped start and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Start to use (s, rounded to four decimals).
    pub start_seconds: f64,
    /// Which rule applied.
    pub outcome: SnapOutcome,
}

/// Snaps dragged windows onto neighbouring window edges.
///
/// # Example
///
/// ```
/// use arinc_schedule::models::{ModuleSchedule, PartitionSchedule, WindowRef, WindowSchedule};
/// use arinc_schedule::snapping::Snapper;
///
/// let schedule = ModuleSchedule::new("Main", 10.0)
///     .with_partition(PartitionSchedule::new("A").with_window(WindowSchedule::new("W", 0.0, 4.0)))
///     .with_partition(PartitionSchedule::new("B").with_window(WindowSchedule::new("W", 6.0, 2.0)));
///
/// let snapper = Snapper::new();
/// let moving = WindowRef::new("B", "W");
/// // 4.2 is within 0.3s of A's end at 4.0.
/// assert_eq!(snapper.snap_start(&schedule, &moving, 0, 4.2, 2.0), 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapper {
    threshold_ratio: f64,
    enabled: bool,
}

impl Default for Snapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapper {
    /// Creates a snapper with the default 3% threshold.
    pub fn new() -> Self {
        Self {
            threshold_ratio: DEFAULT_SNAP_THRESHOLD_RATIO,
            enabled: true,
        }
    }

    /// Creates a snapper that only rounds.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Sets the threshold as a fraction of the major frame.
    pub fn with_threshold_ratio(mut self, threshold_ratio: f64) -> Self {
        self.threshold_ratio = threshold_ratio;
        self
    }

    /// Threshold ratio in use.
    pub fn threshold_ratio(&self) -> f64 {
        self.threshold_ratio
    }

    /// Whether snapping is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Snap distance for a schedule (s).
    pub fn threshold(&self, schedule: &ModuleSchedule) -> f64 {
        self.threshold_ratio * schedule.major_frame_seconds
    }

    /// Snapped start for a window of `duration` dragged to `proposed_start` on `core`.
    pub fn snap_start(
        &self,
        schedule: &ModuleSchedule,
        moving: &WindowRef,
        core: CoreIndex,
        proposed_start: f64,
        duration: f64,
    ) -> f64 {
        self.snap(schedule, moving, core, proposed_start, duration)
            .start_seconds
    }

    /// Like [`Snapper::snap_start`], also reporting which rule applied.
    pub fn snap(
        &self,
        schedule: &ModuleSchedule,
        moving: &WindowRef,
        core: CoreIndex,
        proposed_start: f64,
        duration: f64,
    ) -> SnapResult {
        let unchanged = SnapResult {
            start_seconds: round_time(proposed_start),
            outcome: SnapOutcome::Unchanged,
        };
        if !self.enabled {
            return unchanged;
        }

        let Some(boundary) = schedule.find_closest_boundary(core, proposed_start, Some(moving))
        else {
            return unchanged;
        };

        let threshold = self.threshold(schedule);
        if (proposed_start - boundary.value).abs() >= threshold {
            return unchanged;
        }

        let result = match boundary.kind {
            BoundaryKind::Start => {
                let start = boundary.value - duration;
                if start < 0.0 {
                    return unchanged;
                }
                SnapResult {
                    start_seconds: round_time(start),
                    outcome: SnapOutcome::EndToStart,
                }
            }
            BoundaryKind::End => SnapResult {
                start_seconds: round_time(boundary.value),
                outcome: SnapOutcome::StartToEnd,
            },
        };

        debug!(
            window = %moving,
            core,
            proposed_start,
            snapped_start = result.start_seconds,
            outcome = ?result.outcome,
            "snapped window start"
        );
        result
    }
}
