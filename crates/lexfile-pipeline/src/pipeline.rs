//! Upload pipeline: store → extract → analyze → record → offer follow-up.

use std::sync::Arc;

use lexfile_analysis::{build_analysis_prompt, AnalysisClient};
use lexfile_core::{AppError, NewDocument};
use lexfile_db::DocumentStore;
use lexfile_extract::{supported_formats, ExtractedText, ExtractionStatus};
use lexfile_session::FollowupSessions;
use lexfile_storage::Storage;
use uuid::Uuid;

use crate::types::{UploadEvent, UploadOutcome};

fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let path = std::path::Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() || s.len() < 3 {
        "file".to_string()
    } else {
        s
    }
}

fn file_extension(filename: &str) -> String {
    filename.rsplit('.').next().unwrap_or("").to_lowercase()
}

/// The document intelligence pipeline.
///
/// One sequential flow per upload; concurrent uploads from different users
/// are independent. Concurrent uploads from the same user race on that
/// user's single context slot and the most recently completed pipeline wins.
pub struct DocumentPipeline {
    storage: Arc<dyn Storage>,
    documents: Arc<dyn DocumentStore>,
    client: Arc<AnalysisClient>,
    sessions: Arc<FollowupSessions>,
}

impl DocumentPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        documents: Arc<dyn DocumentStore>,
        client: Arc<AnalysisClient>,
        sessions: Arc<FollowupSessions>,
    ) -> Self {
        Self {
            storage,
            documents,
            client,
            sessions,
        }
    }

    /// Process one upload event end to end.
    ///
    /// Returns `Err` only when the file bytes could not be written to
    /// storage at all. Every later failure (extraction, analysis,
    /// persistence) degrades to user-facing text inside the outcome, and a
    /// document record is created regardless of extraction or analysis
    /// result.
    #[tracing::instrument(
        skip(self, event),
        fields(filename = %event.filename, uploader = ?event.uploader_id)
    )]
    pub async fn process_upload(&self, event: UploadEvent) -> Result<UploadOutcome, AppError> {
        let UploadEvent {
            uploader_id,
            filename,
            content_type,
            data,
        } = event;

        let safe_name = sanitize_filename(&filename);
        let extension = file_extension(&safe_name);
        let file_size = data.len() as i64;

        // Extraction first, while the payload is still borrowed; the bytes
        // move into storage afterwards. Extraction runs on the blocking pool
        // because the format libraries are synchronous CPU/file work.
        let display_name = safe_name.clone();
        let block_ext = extension.clone();
        let (extracted, data) = tokio::task::spawn_blocking(move || {
            let extracted = lexfile_extract::extract_bytes(&data, &display_name, &block_ext);
            (extracted, data)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let (storage_key, _storage_url) = self
            .storage
            .upload(&stored_name, &content_type, data)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::info!(
            storage_key = %storage_key,
            size_bytes = file_size,
            status = ?extracted.status,
            "File stored and text extracted"
        );

        // Analysis is skipped only for unreadable files; empty extraction
        // still goes through so the reasoning step can flag it.
        let (analysis_text, analysis_succeeded) = if extracted.is_analyzable() {
            let prompt = build_analysis_prompt(&extracted.text, &safe_name);
            let outcome = self.client.analyze(&prompt).await;
            (outcome.presentable_text(), outcome.is_success())
        } else {
            (
                extracted
                    .note()
                    .unwrap_or("Text extraction failed")
                    .to_string(),
                false,
            )
        };

        // The audit row is written exactly once per upload, whatever came of
        // extraction or analysis. A failure here is reported but does not
        // retract the already-stored bytes.
        let record = match self
            .documents
            .save(NewDocument {
                filename: safe_name.clone(),
                storage_key,
                content_type,
                file_size,
                analysis: analysis_text.clone(),
                uploaded_by: uploader_id,
            })
            .await
        {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(error = %e.detailed_message(), "Error saving document record");
                None
            }
        };

        let mut followup_offered = false;
        if extracted.is_analyzable() {
            if let Some(user_id) = uploader_id {
                self.sessions
                    .open(user_id, &safe_name, &extracted.text, &analysis_text)
                    .await;
                followup_offered = true;
            }
        }

        let message = compose_message(
            &safe_name,
            &extracted,
            &analysis_text,
            analysis_succeeded,
            record.is_some(),
        );

        Ok(UploadOutcome {
            record,
            message,
            followup_offered,
        })
    }
}

/// Build the user-visible reply for one upload.
///
/// Unreadable files get the extraction error with the supported-format list
/// repeated; readable files get the analysis narrative (which is itself the
/// failure notice when the service was unavailable).
fn compose_message(
    filename: &str,
    extracted: &ExtractedText,
    analysis_text: &str,
    analysis_succeeded: bool,
    record_saved: bool,
) -> String {
    let mut message = if !extracted.is_analyzable() {
        format!(
            "Your file could not be read. {}\n\nSupported formats: {}",
            extracted.note().unwrap_or("Unknown extraction error"),
            supported_formats()
        )
    } else {
        let header = if analysis_succeeded {
            format!("Initial Legal Analysis Complete: {}\n\n", filename)
        } else {
            format!("File Received: {}\n\n", filename)
        };
        let mut body = header;
        if extracted.status == ExtractionStatus::Empty {
            if let Some(note) = extracted.note() {
                body.push_str(note);
                body.push_str("\n\n");
            }
        }
        body.push_str(analysis_text);
        body
    };

    if !record_saved {
        message.push_str("\n\nError saving document analysis.");
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths_and_specials() {
        // Path components are dropped, only the base name survives.
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/notes.txt"), "notes.txt");
        assert_eq!(sanitize_filename(".."), "invalid_filename");
        assert_eq!(sanitize_filename("brief (final).pdf"), "brief__final_.pdf");
        assert_eq!(sanitize_filename("a"), "file");
        assert_eq!(sanitize_filename("  "), "file");
    }

    #[test]
    fn test_file_extension_lowercased() {
        assert_eq!(file_extension("Contract.PDF"), "pdf");
        assert_eq!(file_extension("noext"), "noext");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
    }
}
