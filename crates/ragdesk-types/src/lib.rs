//! Shared domain types for ragdesk.
//!
//! This crate contains the core domain types used across the workspace:
//! catalog records (products, FAQs), query intents, LLM request/response
//! shapes, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod record;
