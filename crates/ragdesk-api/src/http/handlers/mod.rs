//! HTTP request handlers for the REST API.

pub mod ask;
pub mod faq;
pub mod product;
pub mod search;

use serde::Deserialize;
use uuid::Uuid;

use crate::http::error::AppError;

/// Query string of the ask endpoints.
#[derive(Debug, Deserialize)]
pub struct AskQuery {
    /// Missing and blank questions are both rejected with 400.
    #[serde(default)]
    pub question: String,
    pub top_n: Option<usize>,
}

/// Query string of the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub top_n: Option<usize>,
}

/// Reject blank text before any provider is called.
pub(crate) fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid id: '{raw}'")))
}
