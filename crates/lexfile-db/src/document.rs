use async_trait::async_trait;
use lexfile_core::{AppError, DocumentRecord, NewDocument};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence seam for the upload pipeline.
///
/// The pipeline depends on this trait rather than on a concrete repository
/// so tests can run against an in-memory double. Implementations must treat
/// `save` as create-once: one call per upload, no upsert.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(&self, document: NewDocument) -> Result<DocumentRecord, AppError>;
}

/// Postgres-backed document repository.
///
/// Rows are exposed read-only to reporting surfaces (dashboard/API layer)
/// through `list_recent`/`get_by_id`; deletion is an administrative action
/// outside this crate.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(
        skip(self, document),
        fields(
            db.table = "documents",
            db.operation = "insert",
            filename = %document.filename
        )
    )]
    pub async fn create(&self, document: NewDocument) -> Result<DocumentRecord, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRecord>(
            r#"
            INSERT INTO documents (
                id, filename, storage_key, content_type, file_size,
                analysis, uploaded_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&document.filename)
        .bind(&document.storage_key)
        .bind(&document.content_type)
        .bind(document.file_size)
        .bind(&document.analysis)
        .bind(document.uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<DocumentRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRecord>(
            "SELECT * FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Most recent uploads first, for reporting surfaces.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<DocumentRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, DocumentRecord>(
            "SELECT * FROM documents ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn save(&self, document: NewDocument) -> Result<DocumentRecord, AppError> {
        self.create(document).await
    }
}
