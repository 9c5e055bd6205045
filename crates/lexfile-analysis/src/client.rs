//! Analysis client: one bounded call, typed failures, presentable output.
//!
//! Callers treat success and failure uniformly as "the text to store and
//! show": a failure narrative substitutes for a real summary so the upload
//! is never lost because analysis failed.

use std::sync::Arc;

use anyhow::Result;
use lexfile_core::AnalysisConfig;

use crate::prompt::{ANALYSIS_SYSTEM_PROMPT, FOLLOWUP_SYSTEM_PROMPT};
use crate::transport::{ChatRequest, ChatTransport, HttpChatTransport};

/// Marker line opening every failure rendering. Callers rely on this to tell
/// "saved but not summarized" apart from a real narrative.
pub const UNAVAILABLE_MARKER: &str = "AI Analysis Unavailable";

/// Typed reasons the reasoning service produced no narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFailure {
    /// No credential configured; decided locally, no network attempted.
    MissingCredentials,
    /// Transport or timeout error, with the underlying detail for
    /// diagnostics.
    ServiceUnreachable(String),
    /// The call returned but carried no usable content.
    EmptyResponse,
}

impl AnalysisFailure {
    /// User-visible prose; always begins with [`UNAVAILABLE_MARKER`].
    pub fn presentable_text(&self) -> String {
        match self {
            AnalysisFailure::MissingCredentials => format!(
                "{}\n\nAnalysis service API key not configured. \
                 The file has been saved to your case files; \
                 ask an administrator to configure OPENAI_API_KEY.",
                UNAVAILABLE_MARKER
            ),
            AnalysisFailure::ServiceUnreachable(detail) => format!(
                "{}\n\nThe AI service could not be reached to analyze this document. \
                 However, the file has been securely saved to your case files.\n\n\
                 Error details: {}",
                UNAVAILABLE_MARKER, detail
            ),
            AnalysisFailure::EmptyResponse => format!(
                "{}\n\nReceived empty response from AI service. \
                 The file has been saved to your case files.",
                UNAVAILABLE_MARKER
            ),
        }
    }
}

/// Result of one analysis or follow-up call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Narrative(String),
    Failed(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Narrative(_))
    }

    /// The text to store and show, success or not.
    pub fn presentable_text(&self) -> String {
        match self {
            AnalysisOutcome::Narrative(text) => text.clone(),
            AnalysisOutcome::Failed(failure) => failure.presentable_text(),
        }
    }
}

/// Client for the external reasoning service.
pub struct AnalysisClient {
    config: AnalysisConfig,
    transport: Arc<dyn ChatTransport>,
}

impl AnalysisClient {
    pub fn new(config: AnalysisConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    /// Build a client backed by the HTTP transport.
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        let transport = HttpChatTransport::new(
            config.api_base_url.clone(),
            config.api_key.clone().unwrap_or_default(),
            config.request_timeout,
        )?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Produce the seven-section analysis narrative for a prepared prompt.
    pub async fn analyze(&self, prompt: &str) -> AnalysisOutcome {
        self.request(ANALYSIS_SYSTEM_PROMPT, prompt, self.config.max_analysis_tokens)
            .await
    }

    /// Answer a follow-up question against a prepared document-scoped prompt.
    pub async fn answer_followup(&self, prompt: &str) -> AnalysisOutcome {
        self.request(
            FOLLOWUP_SYSTEM_PROMPT,
            prompt,
            self.config.max_followup_tokens,
        )
        .await
    }

    async fn request(&self, system_prompt: &str, prompt: &str, max_tokens: u32) -> AnalysisOutcome {
        // Local fast-fail: no credential means no network I/O at all.
        if self.config.api_key.as_deref().unwrap_or("").is_empty() {
            tracing::warn!("Analysis requested without configured API key");
            return AnalysisOutcome::Failed(AnalysisFailure::MissingCredentials);
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            system_prompt: system_prompt.to_string(),
            user_prompt: prompt.to_string(),
            temperature: self.config.temperature,
            max_tokens,
        };

        tracing::info!(
            model = %request.model,
            prompt_chars = prompt.len(),
            "Sending request to analysis service"
        );

        match self.transport.complete(&request).await {
            Ok(content) if content.trim().is_empty() => {
                tracing::warn!("Analysis service returned no usable content");
                AnalysisOutcome::Failed(AnalysisFailure::EmptyResponse)
            }
            Ok(content) => AnalysisOutcome::Narrative(content),
            Err(e) => {
                tracing::error!(error = %e, "Analysis service unreachable");
                AnalysisOutcome::Failed(AnalysisFailure::ServiceUnreachable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport double that records call counts and returns a preset result.
    struct MockTransport {
        calls: AtomicUsize,
        result: Box<dyn Fn() -> Result<String> + Send + Sync>,
    }

    impl MockTransport {
        fn returning(result: impl Fn() -> Result<String> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Box::new(result),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatTransport for MockTransport {
        async fn complete(&self, _request: &ChatRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn config_with_key(key: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            api_key: key.map(String::from),
            ..AnalysisConfig::default()
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_makes_zero_transport_calls() {
        let transport = MockTransport::returning(|| Ok("should not be called".to_string()));
        let client = AnalysisClient::new(config_with_key(None), transport.clone());

        let outcome = client.analyze("prompt").await;

        assert_eq!(
            outcome,
            AnalysisOutcome::Failed(AnalysisFailure::MissingCredentials)
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_missing() {
        let transport = MockTransport::returning(|| Ok("x".to_string()));
        let client = AnalysisClient::new(config_with_key(Some("")), transport.clone());

        let outcome = client.analyze("prompt").await;

        assert_eq!(
            outcome,
            AnalysisOutcome::Failed(AnalysisFailure::MissingCredentials)
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_narrative() {
        let transport = MockTransport::returning(|| Ok("1. Document Type: Brief".to_string()));
        let client = AnalysisClient::new(config_with_key(Some("sk-test")), transport.clone());

        let outcome = client.analyze("prompt").await;

        assert_eq!(
            outcome,
            AnalysisOutcome::Narrative("1. Document Type: Brief".to_string())
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_content_is_empty_response() {
        let transport = MockTransport::returning(|| Ok("  \n ".to_string()));
        let client = AnalysisClient::new(config_with_key(Some("sk-test")), transport);

        let outcome = client.analyze("prompt").await;

        assert_eq!(
            outcome,
            AnalysisOutcome::Failed(AnalysisFailure::EmptyResponse)
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_unreachable_with_detail() {
        let transport =
            MockTransport::returning(|| Err(anyhow::anyhow!("connection timed out")));
        let client = AnalysisClient::new(config_with_key(Some("sk-test")), transport);

        let outcome = client.analyze("prompt").await;

        match outcome {
            AnalysisOutcome::Failed(AnalysisFailure::ServiceUnreachable(detail)) => {
                assert!(detail.contains("connection timed out"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_failures_render_with_unavailable_marker() {
        let failures = [
            AnalysisFailure::MissingCredentials,
            AnalysisFailure::ServiceUnreachable("boom".to_string()),
            AnalysisFailure::EmptyResponse,
        ];

        for failure in failures {
            let text = failure.presentable_text();
            assert!(
                text.starts_with(UNAVAILABLE_MARKER),
                "failure text must lead with the marker: {}",
                text
            );
        }
    }

    #[tokio::test]
    async fn test_outcome_presentable_text_is_uniform() {
        let ok = AnalysisOutcome::Narrative("summary".to_string());
        assert_eq!(ok.presentable_text(), "summary");

        let failed = AnalysisOutcome::Failed(AnalysisFailure::EmptyResponse);
        assert!(failed.presentable_text().contains(UNAVAILABLE_MARKER));
        assert!(!failed.is_success());
    }
}
