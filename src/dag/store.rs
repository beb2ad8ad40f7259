// src/dag/store.rs

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use crate::dag::guard::cycle_path;
use crate::errors::{Result, TodoDagError};
use crate::types::{Adjacency, TaskId};

/// Authoritative in-memory dependency graph.
///
/// Holds the set of known task ids plus, for each task, the ordered list of
/// its prerequisites. The raw mutators (`replace_outgoing`, `remove_task`)
/// do not validate; callers go through [`GraphStore::try_replace_outgoing`]
/// (or run [`crate::dag::guard`] themselves) so the graph stays acyclic.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    tasks: BTreeSet<TaskId>,
    edges: Adjacency,
}

impl GraphStore {
    /// Create a store that knows about `tasks` and has no edges yet.
    pub fn new(tasks: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            tasks: tasks.into_iter().collect(),
            edges: Adjacency::new(),
        }
    }

    /// Build a store from a snapshot that is already known to be acyclic
    /// (e.g. a validated board file).
    ///
    /// Every id mentioned in `edges` is registered as a task.
    pub fn from_snapshot(tasks: impl IntoIterator<Item = TaskId>, edges: Adjacency) -> Self {
        let mut store = Self::new(tasks);
        for (task, prerequisites) in edges {
            store.tasks.insert(task);
            store.tasks.extend(prerequisites.iter().copied());
            store.replace_outgoing(task, &prerequisites);
        }
        store
    }

    /// Make `task` known to the store. Registering twice is a no-op.
    pub fn register_task(&mut self, task: TaskId) {
        if self.tasks.insert(task) {
            debug!(task, "registered task");
        }
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.tasks.contains(&task)
    }

    /// Known task ids, ascending.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.iter().copied()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Full current adjacency. Tasks without prerequisites are absent.
    pub fn snapshot(&self) -> Adjacency {
        self.edges.clone()
    }

    /// Tasks that list `task` as a prerequisite, ascending.
    pub fn dependents_of(&self, task: TaskId) -> Vec<TaskId> {
        self.edges
            .iter()
            .filter(|(_, prerequisites)| prerequisites.contains(&task))
            .map(|(&dependent, _)| dependent)
            .collect()
    }

    /// Replace every outgoing edge of `task` in one step.
    ///
    /// Duplicate ids collapse onto their first occurrence, since an ordered
    /// pair is recorded at most once. An empty list drops the task's entry.
    pub fn replace_outgoing(&mut self, task: TaskId, prerequisites: &[TaskId]) {
        let deduped = dedup_in_order(prerequisites);
        if deduped.is_empty() {
            self.edges.remove(&task);
        } else {
            self.edges.insert(task, deduped);
        }
    }

    /// Check an update request against the current graph without applying it.
    pub fn validate_update(&self, task: TaskId, prerequisites: &[TaskId]) -> Result<()> {
        if !self.contains(task) {
            return Err(TodoDagError::TaskNotFound(task));
        }

        if let Some(unknown) = prerequisites.iter().find(|id| !self.contains(**id)) {
            return Err(TodoDagError::InvalidUpdate(format!(
                "task {task} cannot depend on unknown task {unknown}"
            )));
        }

        if let Some(path) = cycle_path(&self.edges, task, prerequisites) {
            return Err(TodoDagError::CircularDependency(path));
        }

        Ok(())
    }

    /// Validate and, only if that succeeds, apply an update.
    ///
    /// Takes `&mut self` for the whole check-then-write sequence, so two
    /// updates can never be validated against the same stale graph.
    pub fn try_replace_outgoing(&mut self, task: TaskId, prerequisites: &[TaskId]) -> Result<()> {
        self.validate_update(task, prerequisites)?;
        self.replace_outgoing(task, prerequisites);
        info!(task, ?prerequisites, "prerequisites updated");
        Ok(())
    }

    /// Forget `task` and every edge that mentions it.
    ///
    /// Returns `false` if the task was not known.
    pub fn remove_task(&mut self, task: TaskId) -> bool {
        if !self.tasks.remove(&task) {
            return false;
        }

        self.edges.remove(&task);
        self.edges.retain(|_, prerequisites| {
            prerequisites.retain(|p| *p != task);
            !prerequisites.is_empty()
        });

        debug!(task, "removed task and its edges");
        true
    }
}

fn dedup_in_order(ids: &[TaskId]) -> Vec<TaskId> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
