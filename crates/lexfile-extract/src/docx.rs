//! Word document text extraction.
//!
//! Paragraph texts are concatenated with newline separators. A document that
//! parses but yields no text (images only, empty body) is a soft `Empty`
//! outcome.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::types::ExtractedText;

pub fn extract(data: &[u8], filename: &str) -> ExtractedText {
    let doc = match docx_rs::read_docx(data) {
        Ok(doc) => doc,
        Err(e) => {
            return ExtractedText::error(filename, format!("Error reading Word document: {}", e));
        }
    };

    let mut paragraphs = Vec::new();
    for child in &doc.document.children {
        if let DocumentChild::Paragraph(para) = child {
            paragraphs.push(paragraph_text(para));
        }
    }

    let text = paragraphs.join("\n").trim().to_string();

    if text.is_empty() {
        ExtractedText::empty(
            filename,
            "Word document appears to be empty or contains only images.",
        )
    } else {
        ExtractedText::ok(filename, text)
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let RunChild::Text(t) = run_child {
                        text.push_str(&t.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => {
                for link_child in &link.children {
                    if let ParagraphChild::Run(run) = link_child {
                        for run_child in &run.children {
                            if let RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    text
}
