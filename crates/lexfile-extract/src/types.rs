/// Outcome classification for one extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// Usable text was extracted.
    Ok,
    /// The file was readable but yielded no text (e.g. a scanned PDF).
    /// The pipeline still proceeds to analysis and persistence.
    Empty,
    /// The file could not be read at all. Terminal: analysis is skipped.
    Error,
}

/// Plain-text representation of an uploaded file.
///
/// `note` carries the user-facing explanation for `Empty` and `Error`
/// outcomes and is always non-empty for those statuses.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub filename: String,
    pub text: String,
    pub status: ExtractionStatus,
    pub note: Option<String>,
}

impl ExtractedText {
    pub fn ok(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            status: ExtractionStatus::Ok,
            note: None,
        }
    }

    pub fn empty(filename: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: String::new(),
            status: ExtractionStatus::Empty,
            note: Some(note.into()),
        }
    }

    pub fn error(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: String::new(),
            status: ExtractionStatus::Error,
            note: Some(message.into()),
        }
    }

    /// Whether the pipeline should continue to the analysis step.
    pub fn is_analyzable(&self) -> bool {
        self.status != ExtractionStatus::Error
    }

    /// The explanation for a non-`Ok` outcome, if any.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
