// src/engine/mod.rs

//! Request-serialising engine around the graph store.
//!
//! Every caller talks to the store through a [`BoardHandle`]. Requests are
//! funnelled over one bounded channel into a single [`Runtime`] task, which
//! applies them one at a time to the [`CoreBoard`]. Validation and mutation
//! of an update therefore form one critical section, and readers always see
//! the graph either before or after an update, never halfway.
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use tokio::sync::oneshot;

use crate::dag::Schedule;
use crate::errors::Result;
use crate::types::{Adjacency, TaskId, UpdateRequest};

/// A single operation against the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardRequest {
    /// Replace one task's prerequisites, if the result stays acyclic.
    UpdatePrerequisites(UpdateRequest),
    /// Raw current edge set.
    Snapshot,
    /// Earliest-start days and critical path, computed fresh.
    Schedule,
    /// Make a new task id known.
    RegisterTask(TaskId),
    /// Drop a task and every edge that mentions it.
    RemoveTask(TaskId),
    /// Stop the runtime after replying.
    Shutdown,
}

/// Outcome of one [`BoardRequest`].
#[derive(Debug)]
pub enum BoardReply {
    Updated,
    Snapshot(Adjacency),
    Schedule(Schedule),
    Registered,
    /// Whether the task existed.
    Removed(bool),
    ShuttingDown,
    Rejected(crate::errors::TodoDagError),
}

impl BoardReply {
    pub fn into_result(self) -> Result<Self> {
        match self {
            BoardReply::Rejected(err) => Err(err),
            other => Ok(other),
        }
    }
}

/// A request paired with the channel its reply goes back on.
#[derive(Debug)]
pub struct BoardCommand {
    pub request: BoardRequest,
    pub reply: oneshot::Sender<BoardReply>,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreBoard, CoreStep};
pub use self::runtime::{BoardHandle, Runtime};
