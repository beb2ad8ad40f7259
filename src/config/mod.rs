// src/config/mod.rs

//! Board file loading, validation and saving.
//!
//! The board file plays two external roles at once: it is the task store
//! (titles, due dates, images) and the edge store (`after` lists) that
//! persists the dependency graph between runs.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading and writing through the `fs` seam.
//! - `validate.rs`: ids, references and acyclicity.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    load_and_validate, load_and_validate_with, load_update_batch, parse_update_batch, save_to_path,
};
pub use model::{BoardFile, ConfigSection, RawBoardFile, TaskConfig, UpdateBatch};
pub(crate) use validate::validate_title;
