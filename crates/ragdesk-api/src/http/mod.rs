//! HTTP/REST API layer for ragdesk.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and
//! CORS support. There is no authentication.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
