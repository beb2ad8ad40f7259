// src/engine/runtime.rs

use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::dag::Schedule;
use crate::errors::{Result, TodoDagError};
use crate::types::{Adjacency, TaskId, UpdateRequest};

use super::core::CoreBoard;
use super::{BoardCommand, BoardReply, BoardRequest};

/// Drives the [`CoreBoard`] in response to [`BoardCommand`]s.
///
/// This is a pure IO shell around `CoreBoard`: it reads one command at a
/// time from the channel, feeds it to the core and sends the reply back.
/// Because there is exactly one consumer, concurrent updates are applied
/// strictly one after another.
pub struct Runtime {
    core: CoreBoard,
    command_rx: mpsc::Receiver<BoardCommand>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(core: CoreBoard, command_rx: mpsc::Receiver<BoardCommand>) -> Self {
        Self { core, command_rx }
    }

    /// Create a runtime plus a handle connected to it.
    ///
    /// `queue_length` is the channel capacity; it is clamped to at least 1.
    pub fn channel(core: CoreBoard, queue_length: usize) -> (Self, BoardHandle) {
        let (tx, rx) = mpsc::channel(queue_length.max(1));
        (Self::new(core, rx), BoardHandle { tx })
    }

    /// Main loop.
    ///
    /// Returns the final core once a `Shutdown` request has been answered or
    /// every handle has been dropped, so the caller can persist it.
    pub async fn run(mut self) -> CoreBoard {
        info!("board runtime started");

        while let Some(command) = self.command_rx.recv().await {
            let BoardCommand { request, reply } = command;
            debug!(?request, "runtime received request");

            let step = self.core.step(request);

            // A dropped receiver only means the caller stopped waiting.
            let _ = reply.send(step.reply);

            if !step.keep_running {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!("board runtime exiting");
        self.core
    }
}

/// Cloneable client for a running [`Runtime`].
#[derive(Debug, Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<BoardCommand>,
}

impl BoardHandle {
    /// Send one request and wait for its reply.
    pub async fn request(&self, request: BoardRequest) -> Result<BoardReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(BoardCommand {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TodoDagError::EngineClosed)?;

        reply_rx
            .await
            .map_err(|_| TodoDagError::EngineClosed)?
            .into_result()
    }

    pub async fn update_prerequisites(
        &self,
        task: TaskId,
        prerequisites: impl Into<Vec<TaskId>>,
    ) -> Result<()> {
        let update = UpdateRequest::new(task, prerequisites);
        match self.request(BoardRequest::UpdatePrerequisites(update)).await? {
            BoardReply::Updated => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn snapshot(&self) -> Result<Adjacency> {
        match self.request(BoardRequest::Snapshot).await? {
            BoardReply::Snapshot(adjacency) => Ok(adjacency),
            other => Err(unexpected(other)),
        }
    }

    pub async fn schedule(&self) -> Result<Schedule> {
        match self.request(BoardRequest::Schedule).await? {
            BoardReply::Schedule(schedule) => Ok(schedule),
            other => Err(unexpected(other)),
        }
    }

    pub async fn register_task(&self, task: TaskId) -> Result<()> {
        match self.request(BoardRequest::RegisterTask(task)).await? {
            BoardReply::Registered => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Returns whether the task existed.
    pub async fn remove_task(&self, task: TaskId) -> Result<bool> {
        match self.request(BoardRequest::RemoveTask(task)).await? {
            BoardReply::Removed(existed) => Ok(existed),
            other => Err(unexpected(other)),
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.request(BoardRequest::Shutdown).await.map(|_| ())
    }
}

fn unexpected(reply: BoardReply) -> TodoDagError {
    TodoDagError::ContractViolation(format!("unexpected engine reply: {reply:?}"))
}
