use thiserror::Error;

/// Errors that can occur while writing the log file or building error
/// records. These are system-level errors, distinct from the run-level
/// records collected by the aggregator; CSV loading failures never reach
/// here, they become fatal configuration records directly.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
