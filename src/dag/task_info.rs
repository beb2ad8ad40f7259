// src/dag/task_info.rs

//! Task display metadata and scheduled-task rows.

use crate::config::model::TaskConfig;
use crate::dag::scheduler::Schedule;
use crate::types::TaskId;

/// Metadata owned by the task collaborator; opaque to the graph core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub id: TaskId,
    pub title: String,
    pub due_date: Option<String>,
    pub image_url: Option<String>,
}

impl TaskInfo {
    pub fn from_config(id: TaskId, cfg: &TaskConfig) -> Self {
        Self {
            id,
            title: cfg.title.clone(),
            due_date: cfg.due_date.clone(),
            image_url: cfg.image_url.clone(),
        }
    }
}

/// One row of the rendered schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub title: String,
    pub due_date: Option<String>,
    pub image_url: Option<String>,
    /// Day (0-based) on which the task can start at the earliest.
    pub earliest_start: u32,
    /// Whether the task sits at the end of a longest prerequisite chain.
    pub critical: bool,
}

impl ScheduledTask {
    /// Join `infos` with `schedule`, ordered by earliest start then id.
    ///
    /// Ids the schedule knows but `infos` doesn't get an empty title.
    pub fn rows(schedule: &Schedule, infos: &[TaskInfo]) -> Vec<ScheduledTask> {
        schedule
            .ordered()
            .into_iter()
            .map(|(id, earliest_start)| {
                let info = infos.iter().find(|i| i.id == id);
                ScheduledTask {
                    id,
                    title: info.map(|i| i.title.clone()).unwrap_or_default(),
                    due_date: info.and_then(|i| i.due_date.clone()),
                    image_url: info.and_then(|i| i.image_url.clone()),
                    earliest_start,
                    critical: schedule.is_critical(id),
                }
            })
            .collect()
    }
}
