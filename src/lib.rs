//! Partition window schedule model and editing engine.
//!
//! Models an ARINC-653 style major frame split into per-partition time
//! windows, each pinned to one processor core, and provides the pure
//! edit operations and invariant checks a schedule editor builds on.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ModuleSchedule`, `PartitionSchedule`,
//!   `WindowSchedule`, `WindowRef`, and the per-core queries
//! - **`document`**: Persisted document ↔ model conversion (single record
//!   or list fields, numeric text, layout round trip)
//! - **`constraints`**: Frame, overlap, and core checks; save gate; audit
//! - **`snapping`**: Drag snapping to neighbouring window edges
//! - **`editing`**: Field edit, move, resize, split, core add/remove/reassign
//! - **`export`**: Interchange text (XML) writer
//! - **`store`**: Async document store seam and in-memory store
//! - **`session`**: Load → edit → validate → save workflow
//! - **`config`**: Editor settings from TOML
//!
//! # Invariants
//!
//! A saved schedule satisfies, for major frame `F`:
//!
//! - every window lies in `[0, F]` and has positive duration;
//! - windows on the same core never overlap (`[start, end)` intervals);
//! - core assignments stay below `required_cores`;
//! - partition ids are unique, and window ids are unique per partition.
//!
//! Edits check frame bounds eagerly and leave overlaps to the save gate,
//! except for move gestures which refuse to land on another window.
//!
//! # Example
//!
//! ```
//! use arinc_schedule::constraints::validate_for_save;
//! use arinc_schedule::editing::{split_window, WindowField, set_window_field};
//! use arinc_schedule::models::{ModuleSchedule, PartitionSchedule, WindowRef, WindowSchedule};
//!
//! let schedule = ModuleSchedule::new("Main", 10.0)
//!     .with_partition(PartitionSchedule::new("A").with_window(WindowSchedule::new("W", 0.0, 4.0)))
//!     .with_partition(PartitionSchedule::new("B").with_window(WindowSchedule::new("W", 4.0, 4.0)));
//! assert!(validate_for_save(&schedule).is_ok());
//!
//! let moved = set_window_field(&schedule, &WindowRef::new("B", "W"), WindowField::StartSeconds(3.0)).unwrap();
//! assert!(validate_for_save(&moved).is_err());
//!
//! let split = split_window(&schedule, "A", "W").unwrap();
//! assert_eq!(split.partition("A").unwrap().windows.len(), 2);
//! ```

pub mod config;
pub mod constraints;
pub mod document;
pub mod editing;
pub mod error;
pub mod export;
pub mod models;
pub mod session;
pub mod snapping;
pub mod store;

pub use error::{EditError, EditResult, SessionError, SessionResult, ShapeError};
