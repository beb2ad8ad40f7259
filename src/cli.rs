// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::TaskId;

/// Command-line arguments for `tododag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tododag",
    version,
    about = "Track todos with prerequisite links, reject circular plans, and show the schedule.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the board file (TOML).
    ///
    /// Default: `Todos.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Todos.toml", global = true)]
    pub board: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TODODAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// What to do. Defaults to `show`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse + validate the board, print a summary, change nothing.
    Check,
    /// Print every task with its earliest start day; `*` marks the critical path.
    Show,
    /// Print the raw edge list (`task -> prerequisite`).
    Edges,
    /// Print dependency links by title (`prerequisite -> task`).
    Graph,
    /// Create a task under the next free id.
    Add {
        /// Task title; must not be blank.
        title: String,
        /// Free-form due date, shown as-is.
        #[arg(long, value_name = "DATE")]
        due_date: Option<String>,
        #[arg(long, value_name = "URL")]
        image_url: Option<String>,
    },
    /// Replace all prerequisites of one task.
    SetDeps {
        /// Task whose prerequisites are replaced.
        task: TaskId,
        /// New prerequisites; none clears them.
        prerequisites: Vec<TaskId>,
    },
    /// Apply a TOML file of `[[update]]` requests.
    Apply {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete a task and every link that mentions it.
    Remove { task: TaskId },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_deps_parses_ids() {
        let args = CliArgs::try_parse_from(["tododag", "set-deps", "2", "1", "3"]).unwrap();
        match args.command {
            Some(Command::SetDeps {
                task,
                prerequisites,
            }) => {
                assert_eq!(task, 2);
                assert_eq!(prerequisites, vec![1, 3]);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.board, PathBuf::from("Todos.toml"));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(CliArgs::try_parse_from(["tododag", "set-deps", "two"]).is_err());
        assert!(CliArgs::try_parse_from(["tododag", "set-deps", "2", "x"]).is_err());
    }

    #[test]
    fn add_takes_title_and_optional_metadata() {
        let args = CliArgs::try_parse_from([
            "tododag",
            "add",
            "Water plants",
            "--due-date",
            "2026-11-01",
        ])
        .unwrap();
        match args.command {
            Some(Command::Add {
                title,
                due_date,
                image_url,
            }) => {
                assert_eq!(title, "Water plants");
                assert_eq!(due_date.as_deref(), Some("2026-11-01"));
                assert!(image_url.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(CliArgs::try_parse_from(["tododag", "add"]).is_err());
    }

    #[test]
    fn no_subcommand_means_show() {
        let args = CliArgs::try_parse_from(["tododag", "--board", "b.toml"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.board, PathBuf::from("b.toml"));
    }
}
