// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::TaskId;

#[derive(Error, Debug)]
pub enum TodoDagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Invalid update request: {0}")]
    InvalidUpdate(String),

    /// The proposed prerequisites would close a loop. Holds the closed cycle,
    /// starting and ending at the updated task.
    #[error("Circular dependency rejected: {}", format_path(.0))]
    CircularDependency(Vec<TaskId>),

    /// The scheduler was handed a graph that is not acyclic.
    #[error("Internal consistency failure: {0}")]
    ContractViolation(String),

    #[error("Board engine is no longer running")]
    EngineClosed,

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TodoDagError {
    /// Whether the error is a cycle rejection the user can act on by picking
    /// different prerequisites.
    pub fn is_circular(&self) -> bool {
        matches!(self, TodoDagError::CircularDependency(_))
    }
}

fn format_path(path: &[TaskId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, TodoDagError>;
