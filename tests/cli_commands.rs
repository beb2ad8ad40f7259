// tests/cli_commands.rs

mod common;
use crate::common::builders::{BoardFileBuilder, TaskConfigBuilder};
use crate::common::init_tracing;

use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use clap::Parser;
use tododag::cli::CliArgs;
use tododag::config::{load_and_validate_with, BoardFile};
use tododag::errors::TodoDagError;
use tododag::fs::mock::MockFileSystem;
use tododag::fs::FileSystem;
use tododag::run_with;

type TestResult = Result<(), Box<dyn Error>>;

const BOARD: &str = "Todos.toml";

/// 1: buy paint, 2: paint fence (after 1), 3: invite friends.
fn seeded_fs() -> MockFileSystem {
    let text = BoardFileBuilder::new()
        .with_task(1, TaskConfigBuilder::new("Buy paint").due_date("2026-10-20").build())
        .with_task(2, TaskConfigBuilder::new("Paint fence").after(1).build())
        .with_task(
            3,
            TaskConfigBuilder::new("Invite friends")
                .image_url("https://example.com/party.png")
                .build(),
        )
        .to_toml();

    let fs = MockFileSystem::new();
    fs.add_file(BOARD, text);
    fs
}

fn args(rest: &[&str]) -> CliArgs {
    let mut argv = vec!["tododag", "--board", BOARD];
    argv.extend_from_slice(rest);
    CliArgs::try_parse_from(argv).expect("valid test arguments")
}

#[tokio::test]
async fn read_only_commands_leave_board_alone() -> TestResult {
    init_tracing();
    let fs = seeded_fs();
    let before = fs.read_to_string(Path::new(BOARD))?;

    let commands: [&[&str]; 5] = [&[], &["show"], &["check"], &["edges"], &["graph"]];
    for cmd in commands {
        run_with(&fs, args(cmd)).await?;
    }

    assert_eq!(fs.read_to_string(Path::new(BOARD))?, before);
    Ok(())
}

#[tokio::test]
async fn set_deps_saves_new_edges() -> TestResult {
    init_tracing();
    let fs = seeded_fs();

    run_with(&fs, args(&["set-deps", "3", "2", "1"])).await?;

    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    assert_eq!(board.adjacency().get(&3), Some(&vec![2, 1]));
    assert_eq!(
        board.task(1).and_then(|t| t.due_date.clone()).as_deref(),
        Some("2026-10-20")
    );
    Ok(())
}

#[tokio::test]
async fn circular_set_deps_fails_and_keeps_file() -> TestResult {
    init_tracing();
    let fs = seeded_fs();
    let before = fs.read_to_string(Path::new(BOARD))?;

    let err = run_with(&fs, args(&["set-deps", "1", "2"])).await.unwrap_err();
    assert!(err.to_string().contains("circular"));
    assert_eq!(fs.read_to_string(Path::new(BOARD))?, before);
    Ok(())
}

#[tokio::test]
async fn unknown_prerequisite_is_rejected() -> TestResult {
    let fs = seeded_fs();
    let before = fs.read_to_string(Path::new(BOARD))?;

    assert!(run_with(&fs, args(&["set-deps", "3", "99"])).await.is_err());
    assert!(run_with(&fs, args(&["set-deps", "99"])).await.is_err());
    assert_eq!(fs.read_to_string(Path::new(BOARD))?, before);
    Ok(())
}

#[tokio::test]
async fn clearing_prerequisites_writes_empty_list() -> TestResult {
    let fs = seeded_fs();

    run_with(&fs, args(&["set-deps", "2"])).await?;

    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    assert!(board.adjacency().is_empty());
    assert!(board.task(2).is_some_and(|t| t.after.is_empty()));
    Ok(())
}

/// 3 <- [2] is accepted; 1 <- [3] would close 1 -> 3 -> 2 -> 1; 3 <- [3] is a
/// self-reference.
const ORDERED_BATCH: &str = "[[update]]\ntask = 3\nprerequisites = [2]\n\n\
     [[update]]\ntask = 1\nprerequisites = [3]\n\n\
     [[update]]\ntask = 3\nprerequisites = [3]\n";

#[tokio::test]
async fn apply_batch_follows_file_order() -> TestResult {
    init_tracing();
    let fs = seeded_fs();
    fs.add_file("updates.toml", ORDERED_BATCH);

    run_with(&fs, args(&["apply", "updates.toml"])).await?;

    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    let adjacency = board.adjacency();
    assert!(!crate::common::is_cyclic(&adjacency));
    assert_eq!(
        adjacency,
        crate::common::adjacency(&[(2, &[1]), (3, &[2])])
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn apply_batch_is_repeatable() -> TestResult {
    let mut outcomes = BTreeSet::new();
    for _ in 0..50 {
        let fs = seeded_fs();
        fs.add_file("updates.toml", "[[update]]\ntask = 3\nprerequisites = [2]\n\n\
             [[update]]\ntask = 1\nprerequisites = [3]\n");

        run_with(&fs, args(&["apply", "updates.toml"])).await?;
        let board = load_and_validate_with(&fs, Path::new(BOARD))?;
        outcomes.insert(format!("{:?}", board.adjacency()));
    }

    assert_eq!(outcomes.len(), 1, "batch produced different boards: {outcomes:?}");
    assert!(outcomes.contains("{2: [1], 3: [2]}"));
    Ok(())
}

#[tokio::test]
async fn add_creates_task_under_next_id() -> TestResult {
    init_tracing();
    let fs = seeded_fs();

    run_with(
        &fs,
        args(&[
            "add",
            "Water plants",
            "--due-date",
            "2026-11-01",
            "--image-url",
            "https://example.com/plants.png",
        ]),
    )
    .await?;

    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    assert_eq!(board.task_ids(), vec![1, 2, 3, 4]);
    let added = board.task(4).ok_or("task 4 missing")?;
    assert_eq!(added.title, "Water plants");
    assert_eq!(added.due_date.as_deref(), Some("2026-11-01"));
    assert_eq!(added.image_url.as_deref(), Some("https://example.com/plants.png"));
    assert!(added.after.is_empty());

    // The new task can take part in links straight away.
    run_with(&fs, args(&["set-deps", "4", "3"])).await?;
    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    assert_eq!(board.adjacency().get(&4), Some(&vec![3]));
    assert_eq!(board.task(1).and_then(|t| t.due_date.as_deref()), Some("2026-10-20"));
    Ok(())
}

#[tokio::test]
async fn add_on_empty_board_starts_at_one() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(BOARD, "");

    run_with(&fs, args(&["add", "First"])).await?;

    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    assert_eq!(board.task_ids(), vec![1]);
    Ok(())
}

#[tokio::test]
async fn add_with_blank_title_is_rejected() -> TestResult {
    let fs = seeded_fs();
    let before = fs.read_to_string(Path::new(BOARD))?;

    let err = run_with(&fs, args(&["add", "   "])).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TodoDagError>(),
        Some(TodoDagError::ConfigError(msg)) if msg.contains("empty title")
    ));
    assert_eq!(fs.read_to_string(Path::new(BOARD))?, before);
    Ok(())
}

#[tokio::test]
async fn zero_queue_length_is_rejected_before_any_command() -> TestResult {
    let builder = BoardFileBuilder::new()
        .with_task(1, TaskConfigBuilder::new("Buy paint").build())
        .with_request_queue_length(0);
    let fs = MockFileSystem::new();
    fs.add_file(BOARD, builder.to_toml());

    assert!(matches!(
        BoardFile::try_from(builder.build_raw()),
        Err(TodoDagError::ConfigError(msg)) if msg.contains("request_queue_length")
    ));
    assert!(run_with(&fs, args(&["add", "Paint fence"])).await.is_err());
    Ok(())
}

#[tokio::test]
async fn malformed_batch_is_rejected_without_saving() -> TestResult {
    let fs = seeded_fs();
    let before = fs.read_to_string(Path::new(BOARD))?;
    fs.add_file("updates.toml", "[[update]]\ntask = \"three\"\nprerequisites = [2]\n");

    assert!(run_with(&fs, args(&["apply", "updates.toml"])).await.is_err());
    assert_eq!(fs.read_to_string(Path::new(BOARD))?, before);
    Ok(())
}

#[tokio::test]
async fn remove_drops_task_and_its_links() -> TestResult {
    let fs = seeded_fs();

    run_with(&fs, args(&["remove", "1"])).await?;

    let board = load_and_validate_with(&fs, Path::new(BOARD))?;
    assert_eq!(board.task_ids(), vec![2, 3]);
    assert!(board.adjacency().is_empty());

    assert!(run_with(&fs, args(&["remove", "1"])).await.is_err());
    Ok(())
}
