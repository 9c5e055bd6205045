//! Lexfile Pipeline Library
//!
//! Orchestrates one upload event end to end: store bytes → extract text →
//! budget + analyze → record the document (always) → open the follow-up
//! context. Each step's failure is converted to user-facing text at the
//! component boundary; nothing in this flow aborts the surrounding process.

pub mod pipeline;
pub mod types;

pub use pipeline::DocumentPipeline;
pub use types::{UploadEvent, UploadOutcome};
