//! Error types for the reel machine
//!
//! Every variant is a precondition violation or a configuration load failure.
//! A spin without a win is not an error and never shows up here.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReelError {
    #[error("Unknown symbol id: {0} (valid ids are 0..=6)")]
    UnknownSymbol(u8),

    #[error("Symbol sequence must contain at least one symbol")]
    EmptySequence,

    #[error("Row {row} is outside the reel buffer (0..{slots})")]
    RowOutOfRange { row: usize, slots: usize },

    #[error("Reel index {reel} is outside the bank (0..{reels})")]
    ReelOutOfRange { reel: usize, reels: usize },

    #[error("Invalid reel geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Pattern {pattern} does not fit the bank: {reason}")]
    PatternOutOfBounds { pattern: usize, reason: String },

    #[error("Invalid combo entry: {0}")]
    InvalidCombo(String),

    #[error("Duplicate combo entry for symbol {symbol} with run length {run_length}")]
    DuplicateCombo { symbol: u8, run_length: u8 },

    #[error("Reel {reel} is still in motion")]
    ReelInMotion { reel: usize },

    #[error("Machine needs at least {min} reel sequences, got {got}")]
    SequenceCount { min: usize, got: usize },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Result type alias
pub type ReelResult<T> = Result<T, ReelError>;
