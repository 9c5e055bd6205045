//! Lexfile Database Library
//!
//! Repositories for the durable side of the pipeline. The documents table is
//! an append-only audit trail: one row per upload, written after analysis
//! completes (success or failure), never mutated.

pub mod document;

pub use document::{DocumentRepository, DocumentStore};
