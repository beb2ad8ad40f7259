// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;

use std::path::Path;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{
    load_and_validate_with, load_update_batch, save_to_path, validate_title, BoardFile, TaskConfig,
};
use crate::dag::{GraphStore, ScheduledTask, Schedule};
use crate::engine::{BoardHandle, CoreBoard, Runtime};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{Adjacency, TaskId, UpdateRequest};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    run_with(&RealFileSystem, args).await
}

/// [`run`] over an arbitrary filesystem.
///
/// This wires together:
/// - board loading + validation
/// - the graph store behind the engine runtime
/// - the requested command
/// - saving the board when the command changed the graph
pub async fn run_with(fs: &dyn FileSystem, args: CliArgs) -> Result<()> {
    let mut board = load_and_validate_with(fs, &args.board)?;
    info!(path = ?args.board, tasks = board.len(), "board loaded");

    let command = args.command.unwrap_or(Command::Show);

    match command {
        Command::Check => {
            print_check(&board, &store_of(&board));
            return Ok(());
        }
        Command::Show => {
            let schedule = Schedule::compute(&board.adjacency(), board.task_ids())?;
            print_schedule(&board, &schedule);
            return Ok(());
        }
        Command::Edges => {
            print_edges(&board.adjacency());
            return Ok(());
        }
        Command::Graph => {
            print_graph(&board, &store_of(&board));
            return Ok(());
        }
        Command::Add { .. }
        | Command::SetDeps { .. }
        | Command::Apply { .. }
        | Command::Remove { .. } => {}
    }

    // Mutating commands go through the engine so every update is validated
    // against the graph as it stands at that moment.
    let (runtime, handle) = Runtime::channel(
        CoreBoard::new(store_of(&board)),
        board.config().request_queue_length,
    );
    let runtime_task = tokio::spawn(runtime.run());

    let outcome = match command {
        Command::Add {
            title,
            due_date,
            image_url,
        } => {
            let task = TaskConfig {
                title,
                due_date,
                image_url,
                after: Vec::new(),
            };
            add_task(&handle, &mut board, task).await
        }
        Command::SetDeps {
            task,
            prerequisites,
        } => set_deps(&handle, UpdateRequest::new(task, prerequisites)).await,
        Command::Apply { file } => apply_batch(fs, &handle, &file).await,
        Command::Remove { task } => remove(&handle, task).await,
        Command::Check | Command::Show | Command::Edges | Command::Graph => Ok(false),
    };

    handle.shutdown().await?;
    let store = runtime_task.await?.into_store();

    let changed = outcome?;
    if changed {
        persist(fs, &args.board, &board, &store)?;
    }
    Ok(())
}

fn store_of(board: &BoardFile) -> GraphStore {
    GraphStore::from_snapshot(board.task_ids(), board.adjacency())
}

/// Register a new task under the next free id and record its metadata on
/// `board`, so the save that follows includes it.
async fn add_task(handle: &BoardHandle, board: &mut BoardFile, task: TaskConfig) -> Result<bool> {
    let Some(id) = board.next_task_id() else {
        bail!("no free task id left");
    };
    validate_title(id, &task)?;

    handle.register_task(id).await?;
    println!("task {id} added: {}", task.title);
    board.insert_task(id, task);
    Ok(true)
}

async fn set_deps(handle: &BoardHandle, update: UpdateRequest) -> Result<bool> {
    match handle
        .update_prerequisites(update.task, update.prerequisites.clone())
        .await
    {
        Ok(()) => {
            println!(
                "task {}: prerequisites set to {:?}",
                update.task, update.prerequisites
            );
            Ok(true)
        }
        Err(err) if err.is_circular() => {
            println!("rejected: {err}");
            bail!("adding these prerequisites creates a circular dependency")
        }
        Err(err) => Err(err.into()),
    }
}

/// Submit the batch's requests one after another, in file order, so a given
/// file always yields the same board. Returns whether at least one update
/// was applied.
async fn apply_batch(fs: &dyn FileSystem, handle: &BoardHandle, file: &Path) -> Result<bool> {
    let batch = load_update_batch(fs, file)?;
    debug!(requests = batch.update.len(), "applying update batch");

    let mut applied = 0usize;
    let mut rejected = 0usize;
    for update in batch.update {
        let result = handle
            .update_prerequisites(update.task, update.prerequisites.clone())
            .await;
        match result {
            Ok(()) => {
                applied += 1;
                println!(
                    "ok       task {} <- {:?}",
                    update.task, update.prerequisites
                );
            }
            Err(err) => {
                rejected += 1;
                println!(
                    "rejected task {} <- {:?}: {err}",
                    update.task, update.prerequisites
                );
            }
        }
    }

    println!("{applied} applied, {rejected} rejected");
    if rejected > 0 {
        warn!(rejected, "some updates were rejected");
    }
    Ok(applied > 0)
}

async fn remove(handle: &BoardHandle, task: TaskId) -> Result<bool> {
    if handle.remove_task(task).await? {
        println!("task {task} removed");
        Ok(true)
    } else {
        bail!("task {task} does not exist")
    }
}

fn persist(fs: &dyn FileSystem, path: &Path, board: &BoardFile, store: &GraphStore) -> Result<()> {
    let updated = board.with_graph(store.tasks(), &store.snapshot());
    save_to_path(fs, path, &updated)?;
    info!(path = ?path, tasks = updated.len(), "board saved");
    Ok(())
}

/// Dry-run output: config and graph size.
fn print_check(board: &BoardFile, store: &GraphStore) {
    println!("tododag check");
    println!("  config.request_queue_length = {}", board.config().request_queue_length);
    println!("  tasks: {}", store.task_count());
    println!("  edges: {}", store.edge_count());
    println!("  board is valid and acyclic");
}

fn print_schedule(board: &BoardFile, schedule: &Schedule) {
    let rows = ScheduledTask::rows(schedule, &board.infos());
    if rows.is_empty() {
        println!("no tasks");
        return;
    }

    for row in rows {
        let marker = if row.critical { '*' } else { ' ' };
        match row.due_date {
            Some(ref due) => println!(
                "{marker} day {:>3}  #{:<4} {}  (due {due})",
                row.earliest_start, row.id, row.title
            ),
            None => println!(
                "{marker} day {:>3}  #{:<4} {}",
                row.earliest_start, row.id, row.title
            ),
        }
        if let Some(ref url) = row.image_url {
            println!("             image: {url}");
        }
    }

    if let Some(max) = schedule.max_depth() {
        println!();
        println!("critical path ends on day {max}: {:?}", schedule.critical_path);
    }
}

fn print_edges(adjacency: &Adjacency) {
    for (task, prerequisites) in adjacency {
        for p in prerequisites {
            println!("{task} -> {p}");
        }
    }
}

/// Links drawn from prerequisite to dependent, labelled by title.
fn print_graph(board: &BoardFile, store: &GraphStore) {
    for (task, cfg) in board.tasks() {
        let dependents = store.dependents_of(task);
        if dependents.is_empty() {
            debug!(task, "nothing waits on this task");
        }
        for dependent in dependents {
            // Links need both ends.
            let Some(to) = board.task(dependent) else { continue };
            println!("{} -> {}", cfg.title, to.title);
        }
    }
}
