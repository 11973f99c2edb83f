//! Core count and core assignment edits.

use tracing::{debug, info};

use super::{locate, log_rejection};
use crate::constraints::{check_core_index, check_core_removable};
use crate::error::{EditError, EditResult};
use crate::models::{CoreIndex, ModuleSchedule, WindowRef};

/// Adds one core at the end of the core range.
///
/// # Errors
/// `InvalidValue` if the core count cannot grow any further.
pub fn add_core(schedule: &ModuleSchedule) -> EditResult<ModuleSchedule> {
    let required_cores = schedule.required_cores.checked_add(1).ok_or_else(|| {
        EditError::invalid(
            "required_cores",
            format!("{} cores is the maximum", schedule.required_cores),
        )
    })?;
    let mut next = schedule.clone();
    next.required_cores = required_cores;
    info!(required_cores, "core added");
    Ok(next)
}

/// Removes a core that has no windows on it.
///
/// Only the core count changes. Assignments pointing at higher indices
/// are kept as they are, so after removing a middle core the last index
/// in use may fall outside the range; the save gate and
/// [`crate::constraints::audit`] still look at those windows.
///
/// # Errors
/// - `InvalidCore` if `core` is not below the current core count.
/// - `CoreNotEmpty` with the duration still on the core.
/// - `LastCore` if this is the only core.
pub fn remove_core(schedule: &ModuleSchedule, core: CoreIndex) -> EditResult<ModuleSchedule> {
    let result = try_remove_core(schedule, core);
    match &result {
        Ok(next) => info!(core, required_cores = next.required_cores, "core removed"),
        Err(e) => log_rejection("remove_core", &core, e),
    }
    result
}

fn try_remove_core(schedule: &ModuleSchedule, core: CoreIndex) -> EditResult<ModuleSchedule> {
    check_core_index(schedule, core)?;
    check_core_removable(schedule, core)?;
    if schedule.required_cores <= 1 {
        return Err(EditError::LastCore);
    }
    let mut next = schedule.clone();
    next.required_cores -= 1;
    Ok(next)
}

/// Moves a window to another core.
///
/// Overlaps on the target core are not checked here.
///
/// # Errors
/// `InvalidCore` if `core` is out of range; `UnknownPartition` or
/// `UnknownWindow` for a bad reference.
pub fn reassign_core(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    core: CoreIndex,
) -> EditResult<ModuleSchedule> {
    let result = try_reassign_core(schedule, window, core);
    match &result {
        Ok(_) => debug!(window = %window, core, "window reassigned"),
        Err(e) => log_rejection("reassign_core", window, e),
    }
    result
}

fn try_reassign_core(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    core: CoreIndex,
) -> EditResult<ModuleSchedule> {
    locate(schedule, window)?;
    check_core_index(schedule, core)?;
    let mut next = schedule.clone();
    let partition = next
        .partition_mut(&window.partition_id)
        .ok_or_else(|| EditError::UnknownPartition(window.partition_id.clone()))?;
    partition
        .window_core_assignments
        .insert(window.window_id.clone(), core);
    Ok(next)
}
