// Error types for the I/O boundary.
//
// The engine itself (analysis through assembly) is total and has no error
// path. Errors only arise when reading input or configuration and when
// writing MIDI or JSON output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifesongError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input rejected by the CLI's length check. The engine would still
    /// accept it and produce a fallback piece.
    #[error("sequence has {length} symbols, need at least {minimum}")]
    SequenceTooShort { length: usize, minimum: usize },

    #[error("no sequence given: pass one as an argument or with --input")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, LifesongError>;
