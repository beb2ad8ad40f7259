// src/config/loader.rs

use std::path::Path;

use crate::config::model::{BoardFile, RawBoardFile, UpdateBatch};
use crate::errors::{Result, TodoDagError};
use crate::fs::{FileSystem, RealFileSystem};

/// Read a board file and return the raw `RawBoardFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (numeric ids, known prerequisites, acyclicity). Use
/// [`load_and_validate`] for that.
pub fn load_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawBoardFile> {
    if !fs.exists(path) {
        return Err(TodoDagError::ConfigError(format!(
            "board file {:?} not found",
            path
        )));
    }
    let contents = fs.read_to_string(path)?;
    let board: RawBoardFile = toml::from_str(&contents)?;
    Ok(board)
}

/// Load a board file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - non-numeric or duplicate task ids,
///   - unknown `after` references,
///   - dependency cycles,
///   - basic global config sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BoardFile> {
    load_and_validate_with(&RealFileSystem, path.as_ref())
}

/// [`load_and_validate`] over an arbitrary [`FileSystem`].
pub fn load_and_validate_with(fs: &dyn FileSystem, path: &Path) -> Result<BoardFile> {
    let raw = load_from_fs(fs, path)?;
    BoardFile::try_from(raw)
}

/// Serialise `board` and replace the file at `path`.
///
/// Task order follows the TOML table keys; prerequisite order is kept.
pub fn save_to_path(fs: &dyn FileSystem, path: &Path, board: &BoardFile) -> Result<()> {
    let contents = toml::to_string_pretty(&board.to_raw())?;
    fs.write(path, contents.as_bytes())?;
    Ok(())
}

/// Parse a batch of update requests.
///
/// Shape problems (missing or non-numeric task id, prerequisites that are not
/// a list of ids) are reported as [`TodoDagError::InvalidUpdate`].
pub fn parse_update_batch(contents: &str) -> Result<UpdateBatch> {
    toml::from_str(contents).map_err(|e| TodoDagError::InvalidUpdate(e.to_string()))
}

/// Read and parse an update batch file.
pub fn load_update_batch(fs: &dyn FileSystem, path: &Path) -> Result<UpdateBatch> {
    let contents = fs.read_to_string(path)?;
    parse_update_batch(&contents)
}
