use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Errors from placing a piece on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {column} is outside the board (0..{cols})")]
    InvalidColumn { column: usize, cols: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },
}

/// Errors from decoding a replicated board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot has {actual} cells, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid cell symbol {symbol:?} at index {index}")]
    InvalidSymbol { symbol: char, index: usize },

    #[error("piece at row {row}, column {col} sits above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// Contract violations in the evaluation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("winning line requested on a board with no winner")]
    NotTerminal,
}

/// Reasons the authority refuses a move. These never cross the network as
/// failures; the requester just gets unlocked with the reason attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum MoveRejection {
    #[error("waiting for players")]
    MatchNotReady,

    #[error("the match is already over")]
    MatchAlreadyOver,

    #[error("invalid column")]
    InvalidColumn,

    #[error("column is full")]
    ColumnFull,

    #[error("not your turn")]
    NotYourTurn,
}

impl From<BoardError> for MoveRejection {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidColumn { .. } => MoveRejection::InvalidColumn,
            BoardError::ColumnFull { .. } => MoveRejection::ColumnFull,
        }
    }
}

/// Errors surfaced by the coordinators to their local caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinatorError {
    #[error("input is locked until the authority answers")]
    InputLocked,

    #[error("a piece is still dropping")]
    MoveInFlight,

    #[error("move rejected: {0}")]
    Rejected(#[from] MoveRejection),

    #[error("no restart possible outside of a finished match")]
    RestartUnavailable,

    #[error("internal fault while applying a validated move: {0}")]
    Internal(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
