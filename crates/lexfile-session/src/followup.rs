//! Follow-up dialogue transitions.
//!
//! The interceptor ordering invariant lives in [`FollowupSessions::try_answer`]:
//! while a user's context is `AwaitingAnswer`, their next plain-text message
//! must be offered to this handler ahead of any other free-text consumer.
//! The handler returns `None` in every other state so the message falls
//! through to ordinary handling.

use std::sync::Arc;

use lexfile_analysis::{build_followup_prompt, AnalysisClient};

use crate::store::{FollowupContext, SessionState, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No active document context for this user")]
    NoActiveDocument,
}

/// Outcome of one consumed follow-up question.
#[derive(Debug, Clone)]
pub struct FollowupReply {
    /// Answer narrative, or the presentable failure text.
    pub text: String,
    pub succeeded: bool,
}

/// Follow-up session manager: open/ask/close transitions over the injected
/// store, answering through the analysis client.
pub struct FollowupSessions {
    store: Arc<dyn SessionStore>,
    client: Arc<AnalysisClient>,
}

impl FollowupSessions {
    pub fn new(store: Arc<dyn SessionStore>, client: Arc<AnalysisClient>) -> Self {
        Self { store, client }
    }

    /// Open a context for a freshly analyzed document.
    ///
    /// Replaces any existing context for the user unconditionally; a new
    /// upload discards the prior thread without warning.
    pub async fn open(
        &self,
        user_id: i64,
        filename: &str,
        document_text: &str,
        analysis: &str,
    ) {
        tracing::info!(user_id, filename = %filename, "Opening follow-up context");
        self.store
            .put(FollowupContext::new(
                user_id,
                filename,
                document_text,
                analysis,
            ))
            .await;
    }

    /// The user chose to continue: consume the next plain-text message from
    /// them as a question.
    pub async fn request_followup(&self, user_id: i64) -> Result<(), SessionError> {
        let mut context = self
            .store
            .get(user_id)
            .await
            .ok_or(SessionError::NoActiveDocument)?;

        context.state = SessionState::AwaitingAnswer;
        self.store.put(context).await;
        Ok(())
    }

    /// Offer a plain-text message to the follow-up interceptor.
    ///
    /// Returns `None` unless this user is `AwaitingAnswer`, and callers must
    /// then route the message to their ordinary handlers. After an answer
    /// attempt (successful or not) the state returns to `Open`; each further
    /// question needs an explicit continue.
    pub async fn try_answer(&self, user_id: i64, message: &str) -> Option<FollowupReply> {
        let context = self.store.get(user_id).await?;

        if context.state != SessionState::AwaitingAnswer {
            return None;
        }

        tracing::info!(
            user_id,
            filename = %context.filename,
            "Processing follow-up question"
        );

        let prompt = build_followup_prompt(
            message,
            &context.document_text,
            &context.last_analysis,
            &context.filename,
        );

        let outcome = self.client.answer_followup(&prompt).await;

        // Back to Open whatever happened, so the user can retry by choosing
        // continue again rather than being stuck mid-question.
        let mut context = context;
        context.state = SessionState::Open;
        self.store.put(context).await;

        Some(FollowupReply {
            succeeded: outcome.is_success(),
            text: outcome.presentable_text(),
        })
    }

    /// The user is done with this document: clear everything immediately.
    /// Returns whether a context existed.
    pub async fn close(&self, user_id: i64) -> bool {
        let removed = self.store.remove(user_id).await;
        if removed.is_some() {
            tracing::info!(user_id, "Follow-up context cleared");
        }
        removed.is_some()
    }

    /// Current state of the user's context, if any.
    pub async fn state(&self, user_id: i64) -> Option<SessionState> {
        self.store.get(user_id).await.map(|c| c.state)
    }
}
