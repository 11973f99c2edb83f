//! Window splitting.

use tracing::debug;

use crate::constraints::check_frame_bounds;
use crate::error::{EditError, EditResult};
use crate::models::{round_time, ModuleSchedule, WindowSchedule};

/// Splits a window into two halves.
///
/// For a window `[S, S + D)` the first half keeps its id and becomes
/// `[S, S + D/2)`; the second gets a fresh id unique within the partition
/// and covers the rest. Durations are rounded to four decimals, with the
/// second half absorbing the rounding so that the halves sum to `D`.
/// An explicit core assignment is copied to the new id; an implicit one
/// (core 0) stays implicit.
///
/// # Errors
/// `InvalidDuration` when a half would round to nothing, which happens
/// for windows shorter than two rounding steps;
/// `UnknownPartition`/`UnknownWindow` for a bad reference.
pub fn split_window(
    schedule: &ModuleSchedule,
    partition_id: &str,
    window_id: &str,
) -> EditResult<ModuleSchedule> {
    let major_frame_seconds = schedule.major_frame_seconds;
    let mut next = schedule.clone();
    let partition = next
        .partition_mut(partition_id)
        .ok_or_else(|| EditError::UnknownPartition(partition_id.to_string()))?;
    let index = partition
        .windows
        .iter()
        .position(|w| w.window_id == window_id)
        .ok_or_else(|| EditError::unknown_window(partition_id, window_id))?;

    let new_id = partition.fresh_window_id(window_id);
    let original = &mut partition.windows[index];
    let total = original.duration_seconds;
    let first = round_time(total / 2.0);
    let second = WindowSchedule {
        window_id: new_id.clone(),
        start_seconds: round_time(original.start_seconds + first),
        duration_seconds: round_time(total - first),
        partition_period_start: original.partition_period_start.clone(),
    };
    original.duration_seconds = first;
    check_frame_bounds(major_frame_seconds, partition_id, original)?;
    check_frame_bounds(major_frame_seconds, partition_id, &second)?;
    partition.windows.insert(index + 1, second);

    if let Some(core) = partition.window_core_assignments.get(window_id).copied() {
        partition.window_core_assignments.insert(new_id.clone(), core);
    }

    debug!(partition_id, window_id, new_window_id = %new_id, "window split");
    Ok(next)
}
