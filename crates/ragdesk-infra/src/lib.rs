//! Infrastructure layer for ragdesk.
//!
//! Contains implementations of the ports defined in `ragdesk-core`:
//! the OpenAI-compatible completion provider, OpenAI and fastembed
//! embedders, LanceDB and in-memory vector stores, plus configuration
//! loading and the demo catalog seed.

pub mod config;
pub mod embedding;
pub mod llm;
pub mod seed;
pub mod vector;
