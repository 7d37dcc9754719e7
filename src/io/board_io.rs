use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Board;
use crate::ops::id_repair::{IdRepair, repair_ids};

use super::store::atomic_write;

/// Error type for reading and writing board documents
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("could not serialize board: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A parsed document with the id repairs applied to it
#[derive(Debug, Clone)]
pub struct LoadedBoard {
    pub board: Board,
    pub repairs: Vec<IdRepair>,
}

/// Parse and validate a board document (a JSON array of lists). Duplicate
/// and malformed ids are regenerated.
pub fn parse_board(text: &str) -> Result<LoadedBoard, BoardError> {
    let mut board: Board = serde_json::from_str(text).map_err(BoardError::Parse)?;
    let repairs = repair_ids(&mut board);
    if !repairs.is_empty() {
        tracing::info!(count = repairs.len(), "regenerated ids while loading board");
    }
    Ok(LoadedBoard { board, repairs })
}

/// Canonical compact form, as stored and shared
pub fn serialize_board(board: &Board) -> Result<String, BoardError> {
    serde_json::to_string(board).map_err(BoardError::Serialize)
}

/// Pretty form with two-space indentation, as exported
pub fn serialize_board_pretty(board: &Board) -> Result<String, BoardError> {
    serde_json::to_string_pretty(board).map_err(BoardError::Serialize)
}

/// Export target: `path` with `.json` appended unless it already ends so
pub fn export_path(path: &Path) -> PathBuf {
    let has_json_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if has_json_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".json");
        PathBuf::from(name)
    }
}

/// Write the board as pretty JSON. Returns the path actually written.
pub fn export_to_file(board: &Board, path: &Path) -> Result<PathBuf, BoardError> {
    let target = export_path(path);
    let text = serialize_board_pretty(board)?;
    atomic_write(&target, text.as_bytes()).map_err(|source| BoardError::Write {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

pub fn read_document(path: &Path) -> Result<String, BoardError> {
    fs::read_to_string(path).map_err(|source| BoardError::Read {
        path: path.to_path_buf(),
        source,
    })
}
