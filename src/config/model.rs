// src/config/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dag::TaskInfo;
use crate::types::{Adjacency, TaskId};

/// Board file exactly as read from TOML.
///
/// ```toml
/// [config]
/// request_queue_length = 64
///
/// [task.1]
/// title = "Buy paint"
/// due_date = "2026-10-20"
///
/// [task.2]
/// title = "Paint fence"
/// after = [1]
/// ```
///
/// Task keys are strings at this stage; [`BoardFile`] is the validated form
/// with numeric ids and an acyclic `after` graph.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawBoardFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<id>]`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigSection {
    /// Capacity of the engine's request channel. Must be >= 1.
    #[serde(default = "default_request_queue_length")]
    pub request_queue_length: usize,
}

fn default_request_queue_length() -> usize {
    64
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            request_queue_length: default_request_queue_length(),
        }
    }
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskConfig {
    pub title: String,

    /// Free-form due date, shown as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Prerequisites: ids of tasks that must finish before this one starts.
    #[serde(default)]
    pub after: Vec<TaskId>,
}

impl TaskConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
            image_url: None,
            after: Vec::new(),
        }
    }
}

/// A validated board: numeric ids, known prerequisites, no cycles.
///
/// Only obtainable through `TryFrom<RawBoardFile>` (see `config::validate`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFile {
    config: ConfigSection,
    tasks: BTreeMap<TaskId, TaskConfig>,
}

impl BoardFile {
    pub(crate) fn new_unchecked(config: ConfigSection, tasks: BTreeMap<TaskId, TaskConfig>) -> Self {
        Self { config, tasks }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn task(&self, id: TaskId) -> Option<&TaskConfig> {
        self.tasks.get(&id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &TaskConfig)> {
        self.tasks.iter().map(|(&id, cfg)| (id, cfg))
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// One past the highest id in use; `None` once ids are exhausted.
    pub fn next_task_id(&self) -> Option<TaskId> {
        match self.tasks.keys().next_back() {
            Some(&max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Add task metadata. The caller is responsible for the title rule and
    /// for the id being known to the engine.
    pub(crate) fn insert_task(&mut self, id: TaskId, task: TaskConfig) {
        self.tasks.insert(id, task);
    }

    /// Edge set encoded by the `after` lists, in snapshot shape.
    pub fn adjacency(&self) -> Adjacency {
        self.tasks
            .iter()
            .filter(|(_, cfg)| !cfg.after.is_empty())
            .map(|(&id, cfg)| (id, cfg.after.clone()))
            .collect()
    }

    pub fn infos(&self) -> Vec<TaskInfo> {
        self.tasks
            .iter()
            .map(|(&id, cfg)| TaskInfo::from_config(id, cfg))
            .collect()
    }

    /// Copy of this board whose tasks are exactly `ids` (metadata kept for
    /// tasks that survive) and whose `after` lists come from `adjacency`.
    ///
    /// Used to write an engine snapshot back to disk.
    pub fn with_graph(&self, ids: impl IntoIterator<Item = TaskId>, adjacency: &Adjacency) -> Self {
        let tasks = ids
            .into_iter()
            .filter_map(|id| {
                let mut cfg = self.tasks.get(&id)?.clone();
                cfg.after = adjacency.get(&id).cloned().unwrap_or_default();
                Some((id, cfg))
            })
            .collect();

        Self {
            config: self.config.clone(),
            tasks,
        }
    }

    /// Back to the serde mapping, for saving.
    pub fn to_raw(&self) -> RawBoardFile {
        RawBoardFile {
            config: self.config.clone(),
            task: self
                .tasks
                .iter()
                .map(|(id, cfg)| (id.to_string(), cfg.clone()))
                .collect(),
        }
    }
}

/// Batch of update requests, as read by `tododag apply`.
///
/// ```toml
/// [[update]]
/// task = 2
/// prerequisites = [1]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateBatch {
    #[serde(default)]
    pub update: Vec<crate::types::UpdateRequest>,
}
