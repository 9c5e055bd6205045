//! PDF text extraction, page by page.
//!
//! A single unreadable page is logged and skipped rather than failing the
//! whole document. A PDF whose pages all come back empty is reported as a
//! soft `Empty` outcome (likely scanned/image-based), not an error.

use lopdf::Document;

use crate::types::ExtractedText;

pub fn extract(data: &[u8], filename: &str) -> ExtractedText {
    let doc = match Document::load_mem(data) {
        Ok(doc) => doc,
        Err(e) => {
            return ExtractedText::error(
                filename,
                format!(
                    "Error reading PDF: {}. The file may be corrupted or password-protected.",
                    e
                ),
            );
        }
    };

    let pages = doc.get_pages();
    let page_count = pages.len();

    let text = collect_page_text(pages.keys().copied(), |page_number| {
        doc.extract_text(&[page_number])
    });

    if text.is_empty() {
        ExtractedText::empty(
            filename,
            format!(
                "PDF has {} pages but no extractable text found. It may be scanned/image-based.",
                page_count
            ),
        )
    } else {
        ExtractedText::ok(filename, text)
    }
}

/// Run `extract_page` over every page number, skipping failures.
///
/// Factored out so the partial-failure tolerance can be exercised without
/// fabricating a PDF that breaks on exactly one page.
fn collect_page_text<I, F, E>(pages: I, mut extract_page: F) -> String
where
    I: Iterator<Item = u32>,
    F: FnMut(u32) -> Result<String, E>,
    E: std::fmt::Display,
{
    let mut text = String::new();

    for page_number in pages {
        match extract_page(page_number) {
            Ok(page_text) => {
                let trimmed = page_text.trim();
                if !trimmed.is_empty() {
                    text.push_str(trimmed);
                    text.push('\n');
                }
            }
            Err(e) => {
                tracing::warn!(
                    page = page_number,
                    error = %e,
                    "Error extracting PDF page, skipping"
                );
            }
        }
    }

    text.trim().to_string()
}
