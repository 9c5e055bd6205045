//! Plain-text, Markdown, and JSON extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ExtractedText;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup tag pattern is valid"));

/// UTF-8 text file, read as-is.
pub fn extract_plain(data: &[u8], filename: &str) -> ExtractedText {
    let content = match std::str::from_utf8(data) {
        Ok(s) => s.trim(),
        Err(e) => {
            return ExtractedText::error(filename, format!("Text file is not valid UTF-8: {}", e));
        }
    };

    if content.is_empty() {
        ExtractedText::empty(filename, "Text file is empty.")
    } else {
        ExtractedText::ok(filename, content)
    }
}

/// Markdown, rendered to HTML and then stripped of all tags.
///
/// Lossy on purpose: tables and links collapse to bare text, which is
/// acceptable for summarization.
pub fn extract_markdown(data: &[u8], filename: &str) -> ExtractedText {
    let source = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(e) => {
            return ExtractedText::error(
                filename,
                format!("Markdown file is not valid UTF-8: {}", e),
            );
        }
    };

    let parser = pulldown_cmark::Parser::new(source);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);

    let text = MARKUP_TAG.replace_all(&html, "").trim().to_string();

    if text.is_empty() {
        ExtractedText::empty(filename, "Markdown file is empty.")
    } else {
        ExtractedText::ok(filename, text)
    }
}

/// JSON, re-serialized with stable two-space indentation under a header line
/// so the structure survives into the analysis prompt.
pub fn extract_json(data: &[u8], filename: &str) -> ExtractedText {
    let value: serde_json::Value = match serde_json::from_slice(data) {
        Ok(v) => v,
        Err(e) => {
            return ExtractedText::error(filename, format!("Error parsing JSON: {}", e));
        }
    };

    let formatted = match serde_json::to_string_pretty(&value) {
        Ok(s) => s,
        Err(e) => {
            return ExtractedText::error(filename, format!("Error formatting JSON: {}", e));
        }
    };

    ExtractedText::ok(filename, format!("JSON Content:\n{}", formatted))
}
