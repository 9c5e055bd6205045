//! Extension-dispatched extraction with a panic-proof component boundary.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use crate::types::ExtractedText;
use crate::{docx, pdf, sheet, text};

/// Extensions the extractor understands, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["pdf", "docx", "doc", "txt", "md", "json", "xlsx", "xls"];

/// Human-readable supported-format list, repeated verbatim in rejection
/// messages.
pub fn supported_formats() -> String {
    "PDF, DOCX, TXT, MD, JSON, XLSX".to_string()
}

/// Extract text from a file on disk.
///
/// Reads the file and delegates to [`extract_bytes`]. An unreadable path is
/// an `Error` outcome, not an `Err`.
pub fn extract(path: &Path, declared_extension: &str) -> ExtractedText {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match std::fs::read(path) {
        Ok(data) => extract_bytes(&data, &filename, declared_extension),
        Err(e) => ExtractedText::error(filename, format!("Could not open file: {}", e)),
    }
}

/// Extract text from an in-memory payload.
///
/// Dispatches on the lowercase declared extension only, no content sniffing.
/// The whole dispatch runs under `catch_unwind`: extraction libraries can
/// panic on malformed inputs (fonts/glyphs in particular), and this boundary
/// must never propagate a panic or error to the pipeline.
pub fn extract_bytes(data: &[u8], filename: &str, declared_extension: &str) -> ExtractedText {
    let ext = declared_extension.trim_start_matches('.').to_lowercase();

    let outcome = catch_unwind(AssertUnwindSafe(|| dispatch(data, filename, &ext)));

    match outcome {
        Ok(extracted) => extracted,
        Err(_) => {
            tracing::error!(
                filename = %filename,
                extension = %ext,
                "Extraction panicked, likely malformed input"
            );
            ExtractedText::error(
                filename,
                format!(
                    "Error extracting text: the .{} file appears to be malformed",
                    ext
                ),
            )
        }
    }
}

fn dispatch(data: &[u8], filename: &str, ext: &str) -> ExtractedText {
    match ext {
        "pdf" => pdf::extract(data, filename),
        "docx" | "doc" => docx::extract(data, filename),
        "txt" => text::extract_plain(data, filename),
        "md" => text::extract_markdown(data, filename),
        "json" => text::extract_json(data, filename),
        "xlsx" | "xls" => sheet::extract(data, filename, ext),
        other => ExtractedText::error(
            filename,
            format!(
                "Unsupported file type: {}. Supported: {}",
                other,
                supported_formats()
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionStatus;
    use std::io::Write;

    #[test]
    fn test_unsupported_extension_is_terminal_error() {
        let result = extract_bytes(b"MZ\x90\x00", "setup.exe", "exe");
        assert_eq!(result.status, ExtractionStatus::Error);
        let note = result.note().unwrap();
        assert!(note.contains("Unsupported file type: exe"));
        assert!(note.contains("PDF, DOCX, TXT, MD, JSON, XLSX"));
    }

    #[test]
    fn test_extension_dispatch_is_case_insensitive() {
        let result = extract_bytes(b"Hello world", "NOTES.TXT", "TXT");
        assert_eq!(result.status, ExtractionStatus::Ok);
        assert_eq!(result.text, "Hello world");
    }

    #[test]
    fn test_leading_dot_in_extension_tolerated() {
        let result = extract_bytes(b"Hello", "a.txt", ".txt");
        assert_eq!(result.status, ExtractionStatus::Ok);
    }

    #[test]
    fn test_extract_from_path() {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(file, "retainer agreement").unwrap();

        let result = extract(file.path(), "txt");
        assert_eq!(result.status, ExtractionStatus::Ok);
        assert!(result.text.contains("retainer agreement"));
    }

    #[test]
    fn test_missing_path_is_error_not_panic() {
        let result = extract(Path::new("/no/such/file.txt"), "txt");
        assert_eq!(result.status, ExtractionStatus::Error);
        assert!(result.note().unwrap().contains("Could not open file"));
    }

    #[test]
    fn test_garbage_bytes_never_escape_as_errors() {
        // Every supported branch must absorb arbitrary input.
        let garbage = [0xFFu8, 0xFE, 0x00, 0x13, 0x37];
        for ext in SUPPORTED_EXTENSIONS {
            let result = extract_bytes(&garbage, "blob", ext);
            if result.status == ExtractionStatus::Error {
                assert!(
                    !result.note().unwrap().is_empty(),
                    "error outcome for .{} must carry a message",
                    ext
                );
            }
        }
    }
}
