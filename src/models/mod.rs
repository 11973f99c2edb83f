//! Schedule domain models.
//!
//! Provides the in-memory representation of a module schedule: the major
//! frame, its partitions, their windows, and the window → core mapping.
//! Values are plain data; every edit produces a new [`ModuleSchedule`].
//!
//! # Domain Mappings
//!
//! | arinc-schedule | ARINC-653 | Generic scheduling |
//! |----------------|-----------|--------------------|
//! | ModuleSchedule | Module_Schedule | Schedule |
//! | PartitionSchedule | Partition_Schedule | Task |
//! | WindowSchedule | Window_Schedule | Assignment interval |
//! | CoreIndex | processor core | Resource |

mod module;
mod partition;
mod window;

pub use module::{Boundary, BoundaryKind, CoreWindow, ModuleSchedule, TimelineEntry};
pub use partition::PartitionSchedule;
pub use window::{WindowRef, WindowSchedule};

/// Zero-based processor core index.
pub type CoreIndex = usize;

/// Core used by windows without an explicit assignment.
pub const DEFAULT_CORE: CoreIndex = 0;

/// Decimal places kept for every time value the editor produces.
pub const TIME_DECIMALS: i32 = 4;

/// Absolute tolerance for comparing time values (s).
pub const TIME_EPSILON: f64 = 1e-9;

/// Rounds a time value to [`TIME_DECIMALS`] places.
#[inline]
pub fn round_time(seconds: f64) -> f64 {
    let scale = 10f64.powi(TIME_DECIMALS);
    (seconds * scale).round() / scale
}

/// Whether two time values are equal within [`TIME_EPSILON`].
#[inline]
pub fn time_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}
