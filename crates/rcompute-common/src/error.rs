use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Expected {expected} results but response contained {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

/// Coarse classification of a [`ComputeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid local configuration, detected before any I/O.
    Configuration,
    /// Connection, status, timeout or cancellation failures.
    Transport,
    /// The response could not be turned into the declared result types.
    Decode,
    /// An argument could not be serialized.
    Encode,
}

impl ComputeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComputeError::Configuration(_) => ErrorKind::Configuration,
            ComputeError::Transport(_)
            | ComputeError::Status { .. }
            | ComputeError::Timeout(_)
            | ComputeError::Cancelled => ErrorKind::Transport,
            ComputeError::Decode(_) | ComputeError::ArityMismatch { .. } => ErrorKind::Decode,
            ComputeError::Encode(_) => ErrorKind::Encode,
        }
    }

    pub fn encode(err: impl std::fmt::Display) -> Self {
        ComputeError::Encode(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        ComputeError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ComputeError>;
