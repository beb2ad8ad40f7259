// src/dag/mod.rs

//! Dependency graph core.
//!
//! - [`store`] holds the authoritative adjacency and the known task ids.
//! - [`guard`] decides whether a proposed prerequisite list closes a cycle.
//! - [`scheduler`] derives earliest-start days and the critical path.
//! - [`task_info`] carries display metadata and rendered schedule rows.

pub mod guard;
pub mod scheduler;
pub mod store;
pub mod task_info;

pub use guard::{cycle_path, would_create_cycle};
pub use scheduler::{compute_critical_path, compute_earliest_start, Schedule};
pub use store::GraphStore;
pub use task_info::{ScheduledTask, TaskInfo};
