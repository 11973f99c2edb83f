//! Schedule edit operations.
//!
//! Every operation takes the current snapshot by reference and returns a
//! new [`ModuleSchedule`] on success. A rejected edit returns an
//! [`EditError`] and the caller keeps its previous snapshot.
//!
//! Field edits and resizes only check frame bounds; overlaps are left to
//! the save gate ([`crate::constraints::validate_for_save`]) so the user
//! can pass through intermediate conflicting states. Move gestures are
//! the exception: they snap and then refuse to land on another window.
//!
//! | Operation | Checks |
//! |-----------|--------|
//! | [`set_window_field`] | frame bounds |
//! | [`move_window`] | snapping, frame bounds, overlap on the window's core |
//! | [`resize_window`] / [`resize_window_reflow`] | frame bounds |
//! | [`split_window`] | each half keeps a positive duration |
//! | [`add_core`] / [`remove_core`] | core index, core empty |
//! | [`reassign_core`] | core index |

mod cores;
mod resize;
mod split;

pub use cores::{add_core, reassign_core, remove_core};
pub use resize::{resize_window, resize_window_reflow, resize_with_policy, ResizePolicy};
pub use split::split_window;

use tracing::{debug, warn};

use crate::constraints::{check_frame_bounds, Violation};
use crate::error::{EditError, EditResult};
use crate::models::{round_time, CoreIndex, ModuleSchedule, WindowRef, WindowSchedule};
use crate::snapping::Snapper;

/// A window field and its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowField {
    /// New start (s).
    StartSeconds(f64),
    /// New duration (s).
    DurationSeconds(f64),
    /// New opaque period start marker.
    PartitionPeriodStart(Option<serde_json::Value>),
}

/// A partition field and its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionField {
    /// Display name.
    Name(String),
    /// Activation period (s).
    PeriodSeconds(f64),
    /// Execution budget per period (s).
    PeriodDurationSeconds(f64),
}

/// Looks up a window and the core it runs on.
pub(crate) fn locate(
    schedule: &ModuleSchedule,
    window: &WindowRef,
) -> EditResult<(CoreIndex, WindowSchedule)> {
    let partition = schedule
        .partition(&window.partition_id)
        .ok_or_else(|| EditError::UnknownPartition(window.partition_id.clone()))?;
    let found = partition
        .window(&window.window_id)
        .ok_or_else(|| EditError::unknown_window(&window.partition_id, &window.window_id))?;
    Ok((partition.core_of(&window.window_id), found.clone()))
}

/// Copy of `schedule` with one window replaced by `updated`.
pub(crate) fn replace_window(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    updated: WindowSchedule,
) -> EditResult<ModuleSchedule> {
    let mut next = schedule.clone();
    let slot = next
        .partition_mut(&window.partition_id)
        .and_then(|p| p.window_mut(&window.window_id))
        .ok_or_else(|| EditError::unknown_window(&window.partition_id, &window.window_id))?;
    *slot = updated;
    Ok(next)
}

fn log_rejection(operation: &'static str, subject: &dyn std::fmt::Display, err: &EditError) {
    warn!(operation, subject = %subject, error = %err, "edit rejected");
}

/// Sets one field of a window.
///
/// Start and duration are rounded to four decimals and the resulting
/// window must fit in the major frame. Overlaps are not checked.
///
/// # Errors
/// `FrameOverflow` or `InvalidDuration` when the window would not fit;
/// `UnknownPartition`/`UnknownWindow` for a bad reference.
pub fn set_window_field(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    field: WindowField,
) -> EditResult<ModuleSchedule> {
    let result = try_set_window_field(schedule, window, field);
    match &result {
        Ok(_) => debug!(window = %window, "window field updated"),
        Err(e) => log_rejection("set_window_field", window, e),
    }
    result
}

fn try_set_window_field(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    field: WindowField,
) -> EditResult<ModuleSchedule> {
    let (_, mut candidate) = locate(schedule, window)?;
    match field {
        WindowField::StartSeconds(start) => candidate.start_seconds = round_time(start),
        WindowField::DurationSeconds(duration) => {
            candidate.duration_seconds = round_time(duration)
        }
        WindowField::PartitionPeriodStart(value) => candidate.partition_period_start = value,
    }
    check_frame_bounds(
        schedule.major_frame_seconds,
        &window.partition_id,
        &candidate,
    )?;
    replace_window(schedule, window, candidate)
}

/// Moves a window as the end of a drag gesture.
///
/// The proposed start is snapped with `snapper`, then the moved window
/// must fit in the major frame and must not overlap any other window on
/// its core.
///
/// # Errors
/// `FrameOverflow` when the window would leave the frame; `Overlap`
/// naming the moved window and the first window it would hit.
pub fn move_window(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    proposed_start: f64,
    snapper: &Snapper,
) -> EditResult<ModuleSchedule> {
    let result = try_move_window(schedule, window, proposed_start, snapper);
    match &result {
        Ok(_) => debug!(window = %window, proposed_start, "window moved"),
        Err(e) => log_rejection("move_window", window, e),
    }
    result
}

fn try_move_window(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    proposed_start: f64,
    snapper: &Snapper,
) -> EditResult<ModuleSchedule> {
    let (core, mut candidate) = locate(schedule, window)?;
    candidate.start_seconds = snapper.snap_start(
        schedule,
        window,
        core,
        proposed_start,
        candidate.duration_seconds,
    );
    check_frame_bounds(
        schedule.major_frame_seconds,
        &window.partition_id,
        &candidate,
    )?;

    let conflict = schedule.windows_on_core(core).into_iter().find(|other| {
        !window.matches(&other.partition_id, &other.window_id) && other.overlaps(&candidate)
    });
    if let Some(other) = conflict {
        let (a, b) = if candidate.start_seconds <= other.start_seconds {
            (window.clone(), other.window_ref())
        } else {
            (other.window_ref(), window.clone())
        };
        return Err(Violation::Overlap {
            core,
            partition_a: a.partition_id,
            window_a: a.window_id,
            partition_b: b.partition_id,
            window_b: b.window_id,
        }
        .into());
    }

    replace_window(schedule, window, candidate)
}

/// Sets one field of a partition.
///
/// # Errors
/// `InvalidValue` for a negative or non-finite period.
pub fn set_partition_field(
    schedule: &ModuleSchedule,
    partition_id: &str,
    field: PartitionField,
) -> EditResult<ModuleSchedule> {
    let check_period = |field: &'static str, value: f64| {
        if value.is_finite() && value >= 0.0 {
            Ok(round_time(value))
        } else {
            Err(EditError::invalid(field, format!("{value} is not a valid period")))
        }
    };

    let mut next = schedule.clone();
    let partition = next
        .partition_mut(partition_id)
        .ok_or_else(|| EditError::UnknownPartition(partition_id.to_string()))?;
    match field {
        PartitionField::Name(name) => partition.partition_name = name,
        PartitionField::PeriodSeconds(v) => {
            partition.period_seconds = check_period("period_seconds", v)?
        }
        PartitionField::PeriodDurationSeconds(v) => {
            partition.period_duration_seconds = check_period("period_duration_seconds", v)?
        }
    }
    Ok(next)
}

/// Renames the schedule.
pub fn set_schedule_name(schedule: &ModuleSchedule, name: impl Into<String>) -> ModuleSchedule {
    ModuleSchedule {
        schedule_name: name.into(),
        ..schedule.clone()
    }
}

/// Changes the major frame length.
///
/// # Errors
/// `InvalidValue` for a non-positive length; `FrameOverflow` for the
/// first window that would no longer fit.
pub fn set_major_frame(
    schedule: &ModuleSchedule,
    major_frame_seconds: f64,
) -> EditResult<ModuleSchedule> {
    if !major_frame_seconds.is_finite() || major_frame_seconds <= 0.0 {
        return Err(EditError::invalid(
            "major_frame_seconds",
            format!("{major_frame_seconds} is not positive"),
        ));
    }
    let major_frame_seconds = round_time(major_frame_seconds);
    for p in &schedule.partitions {
        for w in &p.windows {
            check_frame_bounds(major_frame_seconds, &p.partition_id, w)?;
        }
    }
    Ok(ModuleSchedule {
        major_frame_seconds,
        ..schedule.clone()
    })
}

/// Moves a partition within the display order.
///
/// # Errors
/// `InvalidValue` when either index is out of range.
pub fn reorder_partition(
    schedule: &ModuleSchedule,
    from: usize,
    to: usize,
) -> EditResult<ModuleSchedule> {
    let len = schedule.partitions.len();
    if from >= len || to >= len {
        return Err(EditError::invalid(
            "partition index",
            format!("{from} -> {to} with {len} partitions"),
        ));
    }
    let mut next = schedule.clone();
    let moved = next.partitions.remove(from);
    next.partitions.insert(to, moved);
    Ok(next)
}
