// src/dag/scheduler.rs

//! Longest-path scheduling over the dependency DAG.
//!
//! Every task takes one day. A task's earliest start is 0 when it has no
//! prerequisites, otherwise one more than the latest earliest start among
//! them. The critical path is every task sitting at the overall maximum.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, error};

use crate::errors::{Result, TodoDagError};
use crate::types::{prerequisites_of, Adjacency, TaskId};

/// Traversal state of a task during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// Prerequisites are being evaluated; seeing the task again means a cycle.
    InProgress,
    Done,
}

/// Derived schedule for a whole board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub earliest_start: BTreeMap<TaskId, u32>,
    pub critical_path: BTreeSet<TaskId>,
}

impl Schedule {
    /// Evaluate `snapshot` for `tasks` (plus every id the snapshot mentions).
    pub fn compute(snapshot: &Adjacency, tasks: impl IntoIterator<Item = TaskId>) -> Result<Self> {
        let earliest_start = compute_earliest_start(snapshot, tasks)?;
        let critical_path = compute_critical_path(&earliest_start);
        Ok(Self {
            earliest_start,
            critical_path,
        })
    }

    /// Length of the longest chain, as the latest earliest-start day.
    ///
    /// `None` for an empty board.
    pub fn max_depth(&self) -> Option<u32> {
        self.earliest_start.values().copied().max()
    }

    pub fn earliest_start_of(&self, task: TaskId) -> Option<u32> {
        self.earliest_start.get(&task).copied()
    }

    pub fn is_critical(&self, task: TaskId) -> bool {
        self.critical_path.contains(&task)
    }

    /// Tasks ordered by earliest start, then id.
    pub fn ordered(&self) -> Vec<(TaskId, u32)> {
        let mut rows: Vec<(TaskId, u32)> =
            self.earliest_start.iter().map(|(&id, &day)| (id, day)).collect();
        rows.sort_by_key(|&(id, day)| (day, id));
        rows
    }
}

/// Earliest start day of every task.
///
/// Covers each id in `tasks`, each key of `snapshot` and each referenced
/// prerequisite; ids without an entry in the snapshot start on day 0.
///
/// The snapshot must be acyclic. A cycle is reported as
/// [`TodoDagError::ContractViolation`] instead of looping forever.
pub fn compute_earliest_start(
    snapshot: &Adjacency,
    tasks: impl IntoIterator<Item = TaskId>,
) -> Result<BTreeMap<TaskId, u32>> {
    let mut all: BTreeSet<TaskId> = tasks.into_iter().collect();
    for (task, prerequisites) in snapshot {
        all.insert(*task);
        all.extend(prerequisites.iter().copied());
    }

    let mut marks: HashMap<TaskId, Mark> = all.iter().map(|&id| (id, Mark::Unvisited)).collect();
    let mut earliest: BTreeMap<TaskId, u32> = BTreeMap::new();

    for &root in &all {
        // (task, prerequisites already pushed)
        let mut stack: Vec<(TaskId, bool)> = vec![(root, false)];

        while let Some((task, expanded)) = stack.pop() {
            if expanded {
                let day = prerequisites_of(snapshot, task)
                    .iter()
                    .filter_map(|p| earliest.get(p))
                    .max()
                    .map_or(0, |&d| d.saturating_add(1));
                earliest.insert(task, day);
                marks.insert(task, Mark::Done);
                continue;
            }

            match marks.get(&task).copied().unwrap_or(Mark::Unvisited) {
                Mark::Done => {}
                Mark::InProgress => {
                    error!(task, "dependency graph handed to the scheduler is cyclic");
                    return Err(TodoDagError::ContractViolation(format!(
                        "task {task} depends on itself through its prerequisites; \
                         the dependency graph is not acyclic"
                    )));
                }
                Mark::Unvisited => {
                    marks.insert(task, Mark::InProgress);
                    stack.push((task, true));
                    for &p in prerequisites_of(snapshot, task).iter().rev() {
                        stack.push((p, false));
                    }
                }
            }
        }
    }

    debug!(tasks = earliest.len(), "computed earliest start days");
    Ok(earliest)
}

/// Tasks whose earliest start equals the maximum; empty in, empty out.
pub fn compute_critical_path(earliest: &BTreeMap<TaskId, u32>) -> BTreeSet<TaskId> {
    let Some(&max) = earliest.values().max() else {
        return BTreeSet::new();
    };

    earliest
        .iter()
        .filter(|&(_, &day)| day == max)
        .map(|(&id, _)| id)
        .collect()
}
