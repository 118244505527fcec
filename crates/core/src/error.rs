//! Unified error types for the Splitpage gateway.
//!
//! Absence is never an error here: a missing cookie or an empty store reads
//! back as `None` or an empty collection. The variants below cover the
//! recoverable failure classes the ingestion boundary reports to callers;
//! throttling is handled at the HTTP layer, which carries its own
//! retry-after state.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the gateway core.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad shape, size, or content of caller-supplied input.
    #[error("{0}")]
    Validation(String),

    /// A required field was absent from the payload.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Variant value was neither "A" nor "B".
    #[error("invalid variant. Must be A or B")]
    InvalidVariant,

    /// Serialized payload exceeded the ingestion ceiling.
    #[error("payload exceeds {max_kb}KB limit")]
    PayloadTooLarge { max_kb: usize },

    /// The waitlist already holds an entry with this email.
    #[error("email already registered")]
    DuplicateEmail,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::MissingField(_) => 400,
            Self::InvalidVariant => 400,
            Self::PayloadTooLarge { .. } => 400,
            Self::Serialization(_) => 400,
            Self::DuplicateEmail => 409,
            Self::Internal(_) => 500,
        }
    }
}
