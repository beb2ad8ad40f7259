// src/engine/core.rs

//! Pure core of the board engine.
//!
//! [`CoreBoard`] consumes one [`BoardRequest`] at a time and produces the
//! reply plus whether the loop should continue. It has no channels, no Tokio
//! types, and does not perform any IO, so it is unit tested directly.

use tracing::{debug, info, warn};

use crate::dag::{GraphStore, Schedule};
use crate::engine::{BoardReply, BoardRequest};
use crate::types::UpdateRequest;

/// Result of handling a single request.
#[derive(Debug)]
pub struct CoreStep {
    pub reply: BoardReply,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Pure core state: the graph store and nothing else.
#[derive(Debug, Clone, Default)]
pub struct CoreBoard {
    store: GraphStore,
}

impl CoreBoard {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn into_store(self) -> GraphStore {
        self.store
    }

    /// Handle one request, updating the store and returning the reply.
    pub fn step(&mut self, request: BoardRequest) -> CoreStep {
        let reply = match request {
            BoardRequest::UpdatePrerequisites(update) => self.update(update),
            BoardRequest::Snapshot => BoardReply::Snapshot(self.store.snapshot()),
            BoardRequest::Schedule => {
                match Schedule::compute(&self.store.snapshot(), self.store.tasks()) {
                    Ok(schedule) => BoardReply::Schedule(schedule),
                    Err(err) => BoardReply::Rejected(err),
                }
            }
            BoardRequest::RegisterTask(task) => {
                self.store.register_task(task);
                BoardReply::Registered
            }
            BoardRequest::RemoveTask(task) => BoardReply::Removed(self.store.remove_task(task)),
            BoardRequest::Shutdown => {
                debug!("shutdown requested");
                return CoreStep {
                    reply: BoardReply::ShuttingDown,
                    keep_running: false,
                };
            }
        };

        CoreStep {
            reply,
            keep_running: true,
        }
    }

    fn update(&mut self, update: UpdateRequest) -> BoardReply {
        let UpdateRequest {
            task,
            prerequisites,
        } = update;

        match self.store.try_replace_outgoing(task, &prerequisites) {
            Ok(()) => BoardReply::Updated,
            Err(err) if err.is_circular() => {
                info!(task, ?prerequisites, %err, "update rejected: circular dependency");
                BoardReply::Rejected(err)
            }
            Err(err) => {
                warn!(task, ?prerequisites, %err, "update rejected");
                BoardReply::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TodoDagError;

    fn update(task: u64, prerequisites: &[u64]) -> BoardRequest {
        BoardRequest::UpdatePrerequisites(UpdateRequest::new(task, prerequisites))
    }

    #[test]
    fn concrete_scenario() {
        let mut core = CoreBoard::new(GraphStore::new([1, 2, 3]));

        assert!(matches!(core.step(update(2, &[1])).reply, BoardReply::Updated));

        let step = core.step(update(1, &[2]));
        assert!(step.keep_running);
        assert!(matches!(
            step.reply,
            BoardReply::Rejected(TodoDagError::CircularDependency(_))
        ));
        assert!(core.store().snapshot().get(&1).is_none());

        match core.step(BoardRequest::Schedule).reply {
            BoardReply::Schedule(schedule) => {
                assert_eq!(schedule.earliest_start_of(1), Some(0));
                assert_eq!(schedule.earliest_start_of(2), Some(1));
                assert_eq!(schedule.earliest_start_of(3), Some(0));
                assert_eq!(schedule.critical_path.iter().copied().collect::<Vec<_>>(), vec![2]);
            }
            other => panic!("expected schedule, got {other:?}"),
        }
    }

    #[test]
    fn register_then_update_new_task() {
        let mut core = CoreBoard::new(GraphStore::new([1]));
        assert!(matches!(core.step(update(5, &[1])).reply, BoardReply::Rejected(_)));

        core.step(BoardRequest::RegisterTask(5));
        assert!(matches!(core.step(update(5, &[1])).reply, BoardReply::Updated));
        assert!(matches!(core.step(BoardRequest::RemoveTask(1)).reply, BoardReply::Removed(true)));
        assert!(core.store().snapshot().is_empty());
    }

    #[test]
    fn shutdown_stops_loop() {
        let mut core = CoreBoard::default();
        let step = core.step(BoardRequest::Shutdown);
        assert!(!step.keep_running);
        assert!(matches!(step.reply, BoardReply::ShuttingDown));
    }
}
