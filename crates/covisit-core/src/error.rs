//! Error types for the engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for engine operations.
///
/// In-memory graph mutators and readers are total and never return these;
/// only snapshot I/O and argument validation can fail.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The snapshot path could not be opened, read, or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot bytes do not match the expected layout: a declared
    /// length exceeds the remaining bytes, or bytes remain after the final
    /// section.
    #[error("malformed snapshot: {detail}")]
    MalformedSnapshot {
        /// What the decoder was reading when it gave up.
        detail: String,
    },

    /// A parameter is outside its valid range.
    #[error("invalid argument: {name} = {value} (expected {expected})")]
    InvalidArgument {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },
}

impl EngineError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        EngineError::MalformedSnapshot {
            detail: detail.into(),
        }
    }
}
