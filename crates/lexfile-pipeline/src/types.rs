use lexfile_core::DocumentRecord;

/// One inbound file event from the surrounding chat/transport framework.
#[derive(Debug, Clone)]
pub struct UploadEvent {
    /// Chat-framework identity of the uploader; unknown uploaders are
    /// tolerated (recorded with a null uploader, no follow-up offered).
    pub uploader_id: Option<i64>,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// What the pipeline produced for one upload.
///
/// `message` is the complete user-visible reply. It always distinguishes
/// "your file could not be read" from "your file was saved but could not be
/// summarized"; the two are never conflated.
#[derive(Debug)]
pub struct UploadOutcome {
    /// The durable record, if persistence succeeded.
    pub record: Option<DocumentRecord>,
    pub message: String,
    /// Whether a follow-up context was opened for the uploader.
    pub followup_offered: bool,
}
