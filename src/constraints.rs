//! Schedule constraint checks.
//!
//! Pure functions that test a schedule (or a candidate window) against
//! the module invariants:
//! - Every window lies inside the major frame
//! - Windows on the same core do not overlap
//! - Core assignments reference existing cores
//! - A core is removed only when nothing runs on it
//! - Partition ids are unique, window ids are unique per partition
//!
//! The `check_*` functions stop at the first violation, which is what the
//! editor surfaces. [`audit`] collects every violation for diagnostics.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{CoreIndex, CoreWindow, ModuleSchedule, WindowSchedule, TIME_EPSILON};

/// Result of a constraint check.
pub type CheckResult = Result<(), Violation>;

/// A broken schedule invariant.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum Violation {
    /// Window starts before 0 or ends after the major frame.
    #[error(
        "window '{partition_id}/{window_id}' [{start_seconds}, {end_seconds}) \
         exceeds major frame of {major_frame_seconds}s"
    )]
    FrameOverflow {
        partition_id: String,
        window_id: String,
        start_seconds: f64,
        end_seconds: f64,
        major_frame_seconds: f64,
    },

    /// Window duration is zero, negative, or not a number.
    #[error("window '{partition_id}/{window_id}' has invalid duration {duration_seconds}s")]
    InvalidDuration {
        partition_id: String,
        window_id: String,
        duration_seconds: f64,
    },

    /// Two windows on the same core intersect.
    #[error(
        "windows '{partition_a}/{window_a}' and '{partition_b}/{window_b}' overlap on core {core}"
    )]
    Overlap {
        core: CoreIndex,
        partition_a: String,
        window_a: String,
        partition_b: String,
        window_b: String,
    },

    /// Core still has windows assigned.
    #[error("core {core} still holds {total_duration_seconds}s of windows")]
    CoreNotEmpty {
        core: CoreIndex,
        total_duration_seconds: f64,
    },

    /// Core index outside `[0, required_cores)`.
    #[error("core {core} is out of range (module has {required_cores} cores)")]
    InvalidCore {
        core: CoreIndex,
        required_cores: usize,
    },

    /// Two partitions share an id.
    #[error("partition id '{partition_id}' is used more than once")]
    DuplicatePartition { partition_id: String },

    /// Two windows of one partition share an id.
    #[error("window id '{window_id}' is used more than once in partition '{partition_id}'")]
    DuplicateWindow {
        partition_id: String,
        window_id: String,
    },
}

/// Checks that a window lies within `[0, major_frame_seconds]`.
///
/// Also rejects non-positive or non-finite durations, which no frame
/// could contain.
pub fn check_frame_bounds(
    major_frame_seconds: f64,
    partition_id: &str,
    window: &WindowSchedule,
) -> CheckResult {
    if !window.duration_seconds.is_finite() || window.duration_seconds <= 0.0 {
        return Err(Violation::InvalidDuration {
            partition_id: partition_id.to_string(),
            window_id: window.window_id.clone(),
            duration_seconds: window.duration_seconds,
        });
    }

    let start = window.start_seconds;
    let end = window.end_seconds();
    if !start.is_finite() || start < -TIME_EPSILON || end > major_frame_seconds + TIME_EPSILON {
        return Err(Violation::FrameOverflow {
            partition_id: partition_id.to_string(),
            window_id: window.window_id.clone(),
            start_seconds: start,
            end_seconds: end,
            major_frame_seconds,
        });
    }

    Ok(())
}

/// Checks that no two windows on the same core overlap.
///
/// Cores holding windows are scanned in ascending index order, including
/// indices left out of range by a core removal. Within a core, windows are
/// sorted by start and adjacent pairs are compared; the first pair where
/// `end[i] > start[i + 1]` is reported.
pub fn check_overlaps(schedule: &ModuleSchedule) -> CheckResult {
    for (core, windows) in schedule.windows_by_core() {
        first_adjacent_overlap(core, &windows)?;
    }
    Ok(())
}

/// Checks a single core for overlapping windows.
pub fn check_core_overlaps(schedule: &ModuleSchedule, core: CoreIndex) -> CheckResult {
    first_adjacent_overlap(core, &schedule.windows_on_core(core))
}

fn first_adjacent_overlap(core: CoreIndex, windows: &[CoreWindow]) -> CheckResult {
    for pair in windows.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.end_seconds() - b.start_seconds > TIME_EPSILON {
            return Err(Violation::Overlap {
                core,
                partition_a: a.partition_id.clone(),
                window_a: a.window_id.clone(),
                partition_b: b.partition_id.clone(),
                window_b: b.window_id.clone(),
            });
        }
    }
    Ok(())
}

/// Checks that a core has nothing assigned to it.
pub fn check_core_removable(schedule: &ModuleSchedule, core: CoreIndex) -> CheckResult {
    let total = schedule.total_duration_on_core(core);
    if total != 0.0 {
        return Err(Violation::CoreNotEmpty {
            core,
            total_duration_seconds: total,
        });
    }
    Ok(())
}

/// Checks that a core index exists on the module.
pub fn check_core_index(schedule: &ModuleSchedule, core: CoreIndex) -> CheckResult {
    if core >= schedule.required_cores {
        return Err(Violation::InvalidCore {
            core,
            required_cores: schedule.required_cores,
        });
    }
    Ok(())
}

fn duplicate_ids(schedule: &ModuleSchedule) -> Vec<Violation> {
    let mut found = Vec::new();
    let mut partitions = HashSet::new();
    for p in &schedule.partitions {
        if !partitions.insert(p.partition_id.as_str()) {
            found.push(Violation::DuplicatePartition {
                partition_id: p.partition_id.clone(),
            });
        }
        let mut windows = HashSet::new();
        for w in &p.windows {
            if !windows.insert(w.window_id.as_str()) {
                found.push(Violation::DuplicateWindow {
                    partition_id: p.partition_id.clone(),
                    window_id: w.window_id.clone(),
                });
            }
        }
    }
    found
}

/// Checks that partition ids, and window ids within each partition, are unique.
pub fn check_unique_ids(schedule: &ModuleSchedule) -> CheckResult {
    match duplicate_ids(schedule).into_iter().next() {
        Some(v) => Err(v),
        None => Ok(()),
    }
}

/// Gate run before a schedule is persisted.
///
/// Succeeds iff no two windows on any core intersect; otherwise returns
/// the first overlap found.
pub fn validate_for_save(schedule: &ModuleSchedule) -> CheckResult {
    check_overlaps(schedule)
}

/// Collects every violation in the schedule.
///
/// Reports, in order: duplicate ids, frame/duration problems per window,
/// out-of-range core assignments, then every overlapping pair (not only
/// adjacent ones) on each core.
pub fn audit(schedule: &ModuleSchedule) -> Vec<Violation> {
    let mut violations = duplicate_ids(schedule);

    for p in &schedule.partitions {
        for w in &p.windows {
            if let Err(v) = check_frame_bounds(schedule.major_frame_seconds, &p.partition_id, w) {
                violations.push(v);
            }
        }
    }

    let mut reported_cores = HashSet::new();
    for p in &schedule.partitions {
        for w in &p.windows {
            let core = p.core_of(&w.window_id);
            if core >= schedule.required_cores && reported_cores.insert(core) {
                violations.push(Violation::InvalidCore {
                    core,
                    required_cores: schedule.required_cores,
                });
            }
        }
    }

    for (core, windows) in schedule.windows_by_core() {
        for (i, a) in windows.iter().enumerate() {
            for b in &windows[i + 1..] {
                // Sorted by start: once b starts after a ends, later ones do too.
                if b.start_seconds >= a.end_seconds() - TIME_EPSILON {
                    break;
                }
                violations.push(Violation::Overlap {
                    core,
                    partition_a: a.partition_id.clone(),
                    window_a: a.window_id.clone(),
                    partition_b: b.partition_id.clone(),
                    window_b: b.window_id.clone(),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PartitionSchedule;

    fn two_partitions(second_start: f64) -> ModuleSchedule {
        ModuleSchedule::new("Main", 10.0)
            .with_partition(
                PartitionSchedule::new("P1").with_window(WindowSchedule::new("W1", 0.0, 4.0)),
            )
            .with_partition(
                PartitionSchedule::new("P2")
                    .with_window(WindowSchedule::new("W1", second_start, 4.0)),
            )
    }

    #[test]
    fn test_frame_bounds_ok() {
        let w = WindowSchedule::new("W1", 6.0, 4.0);
        assert!(check_frame_bounds(10.0, "P1", &w).is_ok());
    }

    #[test]
    fn test_frame_bounds_overflow() {
        let w = WindowSchedule::new("W1", 6.5, 4.0);
        let err = check_frame_bounds(10.0, "P1", &w).unwrap_err();
        match err {
            Violation::FrameOverflow {
                end_seconds,
                major_frame_seconds,
                ..
            } => {
                assert!((end_seconds - 10.5).abs() < 1e-10);
                assert!((major_frame_seconds - 10.0).abs() < 1e-10);
            }
            other => panic!("unexpected violation: {other:?}"),
        }
    }

    #[test]
    fn test_frame_bounds_negative_start() {
        let w = WindowSchedule::new("W1", -0.5, 1.0);
        assert!(matches!(
            check_frame_bounds(10.0, "P1", &w),
            Err(Violation::FrameOverflow { .. })
        ));
    }

    #[test]
    fn test_frame_bounds_invalid_duration() {
        let zero = WindowSchedule::new("W1", 1.0, 0.0);
        let nan = WindowSchedule::new("W2", 1.0, f64::NAN);
        assert!(matches!(
            check_frame_bounds(10.0, "P1", &zero),
            Err(Violation::InvalidDuration { .. })
        ));
        assert!(matches!(
            check_frame_bounds(10.0, "P1", &nan),
            Err(Violation::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_abutting_windows_pass() {
        let s = two_partitions(4.0);
        assert!(check_overlaps(&s).is_ok());
        assert!(validate_for_save(&s).is_ok());
    }

    #[test]
    fn test_overlap_detected() {
        let s = two_partitions(3.0);
        let err = check_overlaps(&s).unwrap_err();
        assert_eq!(
            err,
            Violation::Overlap {
                core: 0,
                partition_a: "P1".into(),
                window_a: "W1".into(),
                partition_b: "P2".into(),
                window_b: "W1".into(),
            }
        );
    }

    #[test]
    fn test_different_cores_do_not_overlap() {
        let s = ModuleSchedule::new("Main", 10.0)
            .with_required_cores(2)
            .with_partition(
                PartitionSchedule::new("P1").with_window(WindowSchedule::new("W1", 0.0, 4.0)),
            )
            .with_partition(
                PartitionSchedule::new("P2")
                    .with_window_on_core(WindowSchedule::new("W1", 1.0, 4.0), 1),
            );
        assert!(validate_for_save(&s).is_ok());
    }

    #[test]
    fn test_lowest_core_reported_first() {
        let s = ModuleSchedule::new("Main", 10.0)
            .with_required_cores(2)
            .with_partition(
                PartitionSchedule::new("A")
                    .with_window_on_core(WindowSchedule::new("W1", 0.0, 4.0), 1)
                    .with_window_on_core(WindowSchedule::new("W2", 2.0, 4.0), 1),
            )
            .with_partition(
                PartitionSchedule::new("B")
                    .with_window(WindowSchedule::new("W1", 5.0, 2.0))
                    .with_window(WindowSchedule::new("W2", 6.0, 2.0)),
            );
        match check_overlaps(&s).unwrap_err() {
            Violation::Overlap { core, .. } => assert_eq!(core, 0),
            other => panic!("unexpected violation: {other:?}"),
        }
    }

    #[test]
    fn test_huge_core_count_scans_only_used_cores() {
        let s = two_partitions(3.0).with_required_cores(usize::MAX);
        assert!(matches!(
            validate_for_save(&s),
            Err(Violation::Overlap { core: 0, .. })
        ));
        let overlaps = audit(&s)
            .into_iter()
            .filter(|v| matches!(v, Violation::Overlap { .. }))
            .count();
        assert_eq!(overlaps, 1);
        assert!(validate_for_save(&two_partitions(4.0).with_required_cores(usize::MAX)).is_ok());
    }

    #[test]
    fn test_core_removable() {
        let s = two_partitions(4.0).with_required_cores(2);
        assert!(check_core_removable(&s, 1).is_ok());
        match check_core_removable(&s, 0).unwrap_err() {
            Violation::CoreNotEmpty {
                core,
                total_duration_seconds,
            } => {
                assert_eq!(core, 0);
                assert!((total_duration_seconds - 8.0).abs() < 1e-10);
            }
            other => panic!("unexpected violation: {other:?}"),
        }
    }

    #[test]
    fn test_core_index() {
        let s = two_partitions(4.0).with_required_cores(2);
        assert!(check_core_index(&s, 1).is_ok());
        assert_eq!(
            check_core_index(&s, 2),
            Err(Violation::InvalidCore {
                core: 2,
                required_cores: 2
            })
        );
    }

    #[test]
    fn test_audit_collects_everything() {
        let s = ModuleSchedule::new("Main", 10.0)
            .with_partition(
                PartitionSchedule::new("P1")
                    .with_window(WindowSchedule::new("W1", 0.0, 5.0))
                    .with_window(WindowSchedule::new("W2", 8.0, 4.0)),
            )
            .with_partition(
                PartitionSchedule::new("P2")
                    .with_window(WindowSchedule::new("W1", 1.0, 1.0))
                    .with_window(WindowSchedule::new("W2", 2.0, 1.0))
                    .with_window_on_core(WindowSchedule::new("W3", 0.0, 1.0), 3),
            );

        let violations = audit(&s);
        let overflow = violations
            .iter()
            .filter(|v| matches!(v, Violation::FrameOverflow { .. }))
            .count();
        let overlaps = violations
            .iter()
            .filter(|v| matches!(v, Violation::Overlap { .. }))
            .count();
        let invalid_core = violations
            .iter()
            .filter(|v| matches!(v, Violation::InvalidCore { core: 3, .. }))
            .count();

        assert_eq!(overflow, 1); // P1/W2 ends at 12
        assert_eq!(overlaps, 2); // P1/W1 covers both P2 windows
        assert_eq!(invalid_core, 1);
    }

    #[test]
    fn test_unique_ids() {
        assert!(check_unique_ids(&two_partitions(4.0)).is_ok());

        let dup_window = ModuleSchedule::new("Main", 10.0).with_partition(
            PartitionSchedule::new("P1")
                .with_window(WindowSchedule::new("W1", 0.0, 1.0))
                .with_window(WindowSchedule::new("W1", 2.0, 1.0)),
        );
        assert_eq!(
            check_unique_ids(&dup_window),
            Err(Violation::DuplicateWindow {
                partition_id: "P1".into(),
                window_id: "W1".into(),
            })
        );

        let dup_partition = two_partitions(4.0)
            .with_partition(PartitionSchedule::new("P1"));
        let violations = audit(&dup_partition);
        assert_eq!(
            violations.first(),
            Some(&Violation::DuplicatePartition {
                partition_id: "P1".into()
            })
        );
    }

    #[test]
    fn test_audit_clean_schedule() {
        assert!(audit(&two_partitions(4.0)).is_empty());
    }

    #[test]
    fn test_violation_messages() {
        let v = Violation::CoreNotEmpty {
            core: 1,
            total_duration_seconds: 2.5,
        };
        assert_eq!(v.to_string(), "core 1 still holds 2.5s of windows");
    }
}
