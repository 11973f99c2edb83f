//! Window resizing.
//!
//! The presentation layer maps the dragged handle to a fraction of the
//! major frame; the new duration is `fraction * major_frame`, rounded to
//! four decimals.
//!
//! Two policies exist and are exposed separately:
//! - **In place**: only the target window changes length; its start and
//!   every other window stay where they are.
//! - **Reflow**: after the resize, every window on the target's core is
//!   packed from 0 in start order with no gaps.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{locate, replace_window};
use crate::constraints::check_frame_bounds;
use crate::error::{EditError, EditResult};
use crate::models::{round_time, ModuleSchedule, WindowRef};

/// How a resize treats the other windows on the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Leave every other window untouched.
    #[default]
    InPlace,
    /// Pack the core's windows back to back from 0.
    Reflow,
}

fn duration_from_fraction(schedule: &ModuleSchedule, fraction: f64) -> EditResult<f64> {
    if !fraction.is_finite() || fraction <= 0.0 {
        return Err(EditError::invalid(
            "fraction",
            format!("{fraction} is not a positive fraction of the frame"),
        ));
    }
    Ok(round_time(fraction * schedule.major_frame_seconds))
}

/// Resizes one window, leaving all others in place.
///
/// # Errors
/// `FrameOverflow` if the window would run past the major frame;
/// `InvalidValue` for a non-positive fraction.
pub fn resize_window(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    fraction: f64,
) -> EditResult<ModuleSchedule> {
    let (_, mut candidate) = locate(schedule, window)?;
    candidate.duration_seconds = duration_from_fraction(schedule, fraction)?;
    check_frame_bounds(
        schedule.major_frame_seconds,
        &window.partition_id,
        &candidate,
    )
    .inspect_err(|v| warn!(window = %window, violation = %v, "resize rejected"))?;

    debug!(
        window = %window,
        duration = candidate.duration_seconds,
        "window resized in place"
    );
    replace_window(schedule, window, candidate)
}

/// Resizes one window, then packs every window on its core from 0.
///
/// Windows keep their relative order (by start before the resize) and
/// are laid out consecutively at cumulative offsets.
///
/// # Errors
/// `FrameOverflow` for the first packed window that would end past the
/// major frame.
pub fn resize_window_reflow(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    fraction: f64,
) -> EditResult<ModuleSchedule> {
    let (core, _) = locate(schedule, window)?;
    let duration = duration_from_fraction(schedule, fraction)?;

    let mut next = schedule.clone();
    let mut offset = 0.0;
    for slot in schedule.windows_on_core(core) {
        let target = slot.window_ref();
        let Some(w) = next
            .partition_mut(&slot.partition_id)
            .and_then(|p| p.window_mut(&slot.window_id))
        else {
            return Err(EditError::unknown_window(&slot.partition_id, &slot.window_id));
        };
        if target == *window {
            w.duration_seconds = duration;
        }
        w.start_seconds = round_time(offset);
        offset += w.duration_seconds;
        check_frame_bounds(schedule.major_frame_seconds, &slot.partition_id, w)
            .inspect_err(|v| warn!(window = %window, violation = %v, "reflow rejected"))?;
    }

    debug!(window = %window, core, duration, "core reflowed after resize");
    Ok(next)
}

/// Resizes with the given policy.
pub fn resize_with_policy(
    schedule: &ModuleSchedule,
    window: &WindowRef,
    fraction: f64,
    policy: ResizePolicy,
) -> EditResult<ModuleSchedule> {
    match policy {
        ResizePolicy::InPlace => resize_window(schedule, window, fraction),
        ResizePolicy::Reflow => resize_window_reflow(schedule, window, fraction),
    }
}
