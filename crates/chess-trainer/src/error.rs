//! Trainer error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("Corrupt line data: {0}")]
    CorruptLine(String),

    #[error("Session still in progress at move {0}")]
    SessionNotComplete(usize),

    #[error(transparent)]
    Line(#[from] chess_lines::LineError),
}
