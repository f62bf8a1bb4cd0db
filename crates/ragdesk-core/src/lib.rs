//! Business logic and port trait definitions for ragdesk.
//!
//! This crate defines the "ports" (provider and store traits) that the
//! infrastructure layer implements, plus the question-answering core built on
//! top of them. It depends only on `ragdesk-types` -- never on
//! `ragdesk-infra` or any database/IO crate.

pub mod aggregate;
pub mod answer;
pub mod catalog;
pub mod classify;
pub mod context;
pub mod embedding;
pub mod llm;
pub mod retrieval;
pub mod vector;

#[cfg(test)]
pub(crate) mod test_support;
