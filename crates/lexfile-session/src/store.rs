//! Session store: one follow-up context per user.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Where a user's context sits in the follow-up dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Analysis shown; the user may choose to continue or stop. Plain text
    /// in this state is NOT consumed by the follow-up handler.
    Open,
    /// The user chose to continue; the next plain-text message from them is
    /// consumed as a question.
    AwaitingAnswer,
}

/// One user's active document context.
///
/// Holds the full extracted text, untouched by the analysis-prompt
/// truncation; follow-up prompts truncate it independently.
#[derive(Debug, Clone)]
pub struct FollowupContext {
    pub user_id: i64,
    pub filename: String,
    pub document_text: String,
    pub last_analysis: String,
    pub state: SessionState,
    pub opened_at: DateTime<Utc>,
}

impl FollowupContext {
    pub fn new(
        user_id: i64,
        filename: impl Into<String>,
        document_text: impl Into<String>,
        last_analysis: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            filename: filename.into(),
            document_text: document_text.into(),
            last_analysis: last_analysis.into(),
            state: SessionState::Open,
            opened_at: Utc::now(),
        }
    }
}

/// Keyed store for follow-up contexts.
///
/// Injected rather than ambient so tests can run against a fake and so the
/// implementation can later grow versioning without touching callers. `put`
/// replaces any existing context for the user wholesale: last write wins,
/// a new upload discards whatever was in progress, no merge.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Option<FollowupContext>;
    async fn put(&self, context: FollowupContext);
    async fn remove(&self, user_id: i64) -> Option<FollowupContext>;
}

/// In-memory session store with the same lifetime as the process.
#[derive(Default)]
pub struct InMemorySessionStore {
    contexts: RwLock<HashMap<i64, FollowupContext>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: i64) -> Option<FollowupContext> {
        self.contexts.read().await.get(&user_id).cloned()
    }

    async fn put(&self, context: FollowupContext) {
        self.contexts.write().await.insert(context.user_id, context);
    }

    async fn remove(&self, user_id: i64) -> Option<FollowupContext> {
        self.contexts.write().await.remove(&user_id)
    }
}
