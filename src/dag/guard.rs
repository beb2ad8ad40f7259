// src/dag/guard.rs

//! Cycle guard for prerequisite updates.
//!
//! Answers one question without touching the store: if `task`'s outgoing
//! edges were replaced by `candidates`, could `task` reach itself?
//!
//! The search is an iterative DFS over the hypothetical graph with a single
//! visited set per call. Nodes are never expanded twice, so the cost is
//! linear in the reachable part of the graph even on diamonds, and the walk
//! terminates even if some unrelated part of the snapshot is already cyclic.

use std::collections::{HashMap, HashSet};

use crate::types::{prerequisites_of, Adjacency, TaskId};

/// `true` if adopting `candidates` as the prerequisites of `task` would
/// introduce a cycle.
///
/// A task naming itself is always a cycle; an empty candidate list never is.
pub fn would_create_cycle(snapshot: &Adjacency, task: TaskId, candidates: &[TaskId]) -> bool {
    cycle_path(snapshot, task, candidates).is_some()
}

/// Like [`would_create_cycle`], but returns the offending loop.
///
/// The path is closed: it starts and ends with `task`, and each element
/// lists the next one as a prerequisite (e.g. `[1, 2, 1]` for "1 needs 2,
/// 2 needs 1").
pub fn cycle_path(
    snapshot: &Adjacency,
    task: TaskId,
    candidates: &[TaskId],
) -> Option<Vec<TaskId>> {
    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut reached_from: HashMap<TaskId, TaskId> = HashMap::new();
    let mut stack: Vec<TaskId> = vec![task];
    visited.insert(task);

    while let Some(node) = stack.pop() {
        for &next in hypothetical_prerequisites(snapshot, task, candidates, node) {
            if next == task {
                return Some(close_path(task, node, &reached_from));
            }
            if visited.insert(next) {
                reached_from.insert(next, node);
                stack.push(next);
            }
        }
    }

    None
}

/// Outgoing edges of `node` in the snapshot with `task`'s edges overwritten.
fn hypothetical_prerequisites<'a>(
    snapshot: &'a Adjacency,
    task: TaskId,
    candidates: &'a [TaskId],
    node: TaskId,
) -> &'a [TaskId] {
    if node == task {
        candidates
    } else {
        prerequisites_of(snapshot, node)
    }
}

/// Rebuild `task -> ... -> last -> task` from the DFS parent links.
fn close_path(task: TaskId, last: TaskId, reached_from: &HashMap<TaskId, TaskId>) -> Vec<TaskId> {
    let mut back = Vec::new();
    let mut current = last;
    while current != task {
        back.push(current);
        match reached_from.get(&current) {
            Some(&parent) => current = parent,
            None => break,
        }
    }

    let mut path = Vec::with_capacity(back.len() + 2);
    path.push(task);
    path.extend(back.into_iter().rev());
    path.push(task);
    path
}
