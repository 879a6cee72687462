//! Parsing error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineError {
    #[error("Malformed script: {0}")]
    MalformedScript(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
}
