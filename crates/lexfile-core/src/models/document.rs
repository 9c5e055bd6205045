use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable record of one uploaded document and its analysis narrative.
///
/// Created exactly once per upload, after analysis completes (success or
/// failure), and never mutated. When analysis fails, the stored `analysis`
/// text is the presentable failure narrative, so the upload is never lost
/// silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentRecord {
    pub id: Uuid,
    /// Sanitized original filename, shown to users.
    pub filename: String,
    /// Opaque storage key; resolve through the storage backend.
    pub storage_key: String,
    pub content_type: String,
    pub file_size: i64,
    /// Seven-section analysis narrative, or the failure text that stood in
    /// for it.
    pub analysis: String,
    /// Chat-framework identity of the uploader. Unknown uploaders are
    /// tolerated.
    pub uploaded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a [`DocumentRecord`].
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub storage_key: String,
    pub content_type: String,
    pub file_size: i64,
    pub analysis: String,
    pub uploaded_by: Option<i64>,
}
