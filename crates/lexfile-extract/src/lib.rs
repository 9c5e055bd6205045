//! Lexfile Extract Library
//!
//! Text extraction from uploaded case files. Dispatch is purely on the
//! declared file extension; every branch returns a status-tagged
//! [`ExtractedText`] and never propagates an error or panic to the caller.
//! Garbled or partially-readable sources degrade to whatever text could be
//! recovered; extracted text is best-effort only.

pub mod docx;
pub mod extractor;
pub mod pdf;
pub mod sheet;
pub mod text;
mod types;

pub use extractor::{extract, extract_bytes, supported_formats, SUPPORTED_EXTENSIONS};
pub use types::{ExtractedText, ExtractionStatus};
