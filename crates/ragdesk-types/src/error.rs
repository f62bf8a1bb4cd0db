use thiserror::Error;

use crate::llm::LlmError;

/// Errors from vector store operations (used by trait definitions in ragdesk-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("vector store connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the embedding provider.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider error: {message}")]
    Provider { message: String },

    #[error("embedding provider authentication failed")]
    AuthenticationFailed,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding provider returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },
}

/// Configuration problems detected at startup. Never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: environment variable '{0}' is not set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from indexing, retrieval and answer composition.
///
/// Empty retrieval, unrecognized classifications and short rankings are not
/// errors; they are answered with canned messages.
#[derive(Debug, Error)]
pub enum RagError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out after {0}ms")]
    TimedOut(u64),
}

impl RagError {
    /// Whether the failure is transient infrastructure trouble worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::Embedding(EmbeddingError::Provider { .. }) => true,
            RagError::Embedding(_) => false,
            RagError::Llm(e) => e.is_retryable(),
            RagError::Store(RepositoryError::Connection(_)) => true,
            RagError::Store(_) => false,
            RagError::InvalidInput(_) => false,
            RagError::Cancelled => false,
            RagError::TimedOut(_) => true,
        }
    }
}
