// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{BoardFile, RawBoardFile, TaskConfig};
use crate::dag::cycle_path;
use crate::errors::{Result, TodoDagError};
use crate::types::{prerequisites_of, TaskId};

impl TryFrom<RawBoardFile> for BoardFile {
    type Error = TodoDagError;

    fn try_from(raw: RawBoardFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        let tasks = parse_task_ids(raw.task)?;
        validate_titles(&tasks)?;
        validate_task_dependencies(&tasks)?;
        validate_dag(&tasks)?;
        Ok(BoardFile::new_unchecked(raw.config, tasks))
    }
}

fn validate_global_config(cfg: &RawBoardFile) -> Result<()> {
    if cfg.config.request_queue_length == 0 {
        return Err(TodoDagError::ConfigError(
            "[config].request_queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn parse_task_ids(raw: BTreeMap<String, TaskConfig>) -> Result<BTreeMap<TaskId, TaskConfig>> {
    let mut tasks = BTreeMap::new();
    for (key, task) in raw {
        let id: TaskId = key.trim().parse().map_err(|_| {
            TodoDagError::ConfigError(format!(
                "task key '{}' is not a numeric id (expected e.g. [task.1])",
                key
            ))
        })?;

        if tasks.insert(id, task).is_some() {
            return Err(TodoDagError::ConfigError(format!(
                "task id {} is defined more than once (key '{}')",
                id, key
            )));
        }
    }
    Ok(tasks)
}

fn validate_titles(tasks: &BTreeMap<TaskId, TaskConfig>) -> Result<()> {
    for (id, task) in tasks.iter() {
        validate_title(*id, task)?;
    }
    Ok(())
}

/// A task needs a title with at least one non-whitespace character.
pub(crate) fn validate_title(id: TaskId, task: &TaskConfig) -> Result<()> {
    if task.title.trim().is_empty() {
        return Err(TodoDagError::ConfigError(format!(
            "task {} has an empty title",
            id
        )));
    }
    Ok(())
}

fn validate_task_dependencies(tasks: &BTreeMap<TaskId, TaskConfig>) -> Result<()> {
    for (id, task) in tasks.iter() {
        for dep in task.after.iter() {
            if dep == id {
                return Err(TodoDagError::CircularDependency(vec![*id, *id]));
            }
            if !tasks.contains_key(dep) {
                return Err(TodoDagError::ConfigError(format!(
                    "task {} has unknown dependency {} in `after`",
                    id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(tasks: &BTreeMap<TaskId, TaskConfig>) -> Result<()> {
    // Edge direction: prerequisite -> task, so a topological order is a
    // valid execution order.
    let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();

    for id in tasks.keys() {
        graph.add_node(*id);
    }

    for (id, task) in tasks.iter() {
        for dep in task.after.iter() {
            graph.add_edge(*dep, *id, ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            let adjacency = tasks
                .iter()
                .map(|(&id, task)| (id, task.after.clone()))
                .collect();
            let path = cycle_path(&adjacency, node, prerequisites_of(&adjacency, node))
                .unwrap_or_else(|| vec![node]);
            Err(TodoDagError::CircularDependency(path))
        }
    }
}
