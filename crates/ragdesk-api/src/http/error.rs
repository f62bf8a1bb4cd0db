//! Application error type mapping to HTTP status codes and envelope format.

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ragdesk_types::error::{EmbeddingError, RagError, RepositoryError};
use ragdesk_types::llm::LlmError;

use crate::http::response::{ApiMeta, ApiResponse, envelope};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure from retrieval, indexing or answering.
    Rag(RagError),
    /// Malformed request (blank question, bad id).
    Validation(String),
    /// Lookup by id found nothing.
    NotFound(String),
}

impl From<RagError> for AppError {
    fn from(e: RagError) -> Self {
        AppError::Rag(e)
    }
}

impl AppError {
    /// Status code and machine-readable code for this error.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Rag(e) => match e {
                RagError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                RagError::Store(RepositoryError::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                RagError::Store(RepositoryError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
                RagError::Store(RepositoryError::Connection(_)) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
                }
                RagError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
                RagError::Embedding(EmbeddingError::DimensionMismatch { .. }) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "EMBEDDING_MISCONFIGURED")
                }
                RagError::Embedding(_) => (StatusCode::SERVICE_UNAVAILABLE, "EMBEDDING_UNAVAILABLE"),
                RagError::Llm(LlmError::RateLimited { .. }) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "RATE_LIMITED")
                }
                RagError::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "LLM_UNAVAILABLE"),
                RagError::TimedOut(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMED_OUT"),
                RagError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED"),
            },
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Rag(e) => e.to_string(),
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::warn!(code, error = %self.message(), "request failed");
        }
        // Handlers that fail before creating a request context have no id.
        let meta = ApiMeta::new(String::new(), Instant::now());
        envelope(status, &ApiResponse::error(code, &self.message(), meta))
    }
}
