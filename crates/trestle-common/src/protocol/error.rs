use thiserror::Error;

/// Failure taxonomy of the bridge core.
///
/// Every variant is a local, synchronous, non-retryable failure surfaced to
/// the immediate caller of the failing operation. None of them corrupt or
/// abort unrelated in-flight calls or other pending handles, and nothing in
/// the core retries automatically.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Unknown extension or method: {0}")]
    NotFound(String),

    #[error("Argument count mismatch: expected {expected}, got {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Duplicate binding: {0}")]
    DuplicateBinding(String),

    #[error("Unknown callback handle: {0}")]
    UnknownHandle(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
