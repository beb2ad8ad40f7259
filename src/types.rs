// src/types.rs

//! Shared identifier and snapshot types.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Opaque, immutable task identifier handed to us by the task collaborator.
pub type TaskId = u64;

/// Point-in-time adjacency: task -> ordered list of its prerequisites.
///
/// Tasks without prerequisites are absent; consumers must treat a missing
/// key and an empty list the same way (see [`prerequisites_of`]).
pub type Adjacency = BTreeMap<TaskId, Vec<TaskId>>;

/// Prerequisites of `task` in `adjacency`, empty if the task has no entry.
pub fn prerequisites_of(adjacency: &Adjacency, task: TaskId) -> &[TaskId] {
    adjacency.get(&task).map(|v| v.as_slice()).unwrap_or(&[])
}

/// A request to replace every prerequisite of one task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    pub task: TaskId,
    pub prerequisites: Vec<TaskId>,
}

impl UpdateRequest {
    pub fn new(task: TaskId, prerequisites: impl Into<Vec<TaskId>>) -> Self {
        Self {
            task,
            prerequisites: prerequisites.into(),
        }
    }
}
