//! Configuration module
//!
//! Env-driven configuration for the pipeline and its collaborators: database,
//! local storage, and the external analysis service. Credentials are optional
//! at load time; their absence is surfaced as a typed failure when the
//! analysis call is attempted, never as a startup panic.

use std::env;
use std::time::Duration;

// Analysis defaults
const ANALYSIS_MODEL: &str = "gpt-4o-mini";
const ANALYSIS_TEMPERATURE: f32 = 0.3;
const ANALYSIS_MAX_TOKENS: u32 = 1000;
const FOLLOWUP_MAX_TOKENS: u32 = 800;
const ANALYSIS_TIMEOUT_SECS: u64 = 60;
const ANALYSIS_API_BASE: &str = "https://api.openai.com/v1";

// Storage defaults
const LOCAL_STORAGE_PATH: &str = "./data/documents";
const LOCAL_STORAGE_BASE_URL: &str = "http://localhost:4000/documents";

/// Top-level configuration for the document pipeline.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: Option<String>,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

/// Local storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub local_storage_path: String,
    pub local_storage_base_url: String,
}

/// External analysis service configuration
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// API key for the reasoning service. `None` means analysis is
    /// unavailable; uploads are still recorded.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_analysis_tokens: u32,
    pub max_followup_tokens: u32,
    pub request_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: ANALYSIS_API_BASE.to_string(),
            model: ANALYSIS_MODEL.to_string(),
            temperature: ANALYSIS_TEMPERATURE,
            max_analysis_tokens: ANALYSIS_MAX_TOKENS,
            max_followup_tokens: FOLLOWUP_MAX_TOKENS,
            request_timeout: Duration::from_secs(ANALYSIS_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage = StorageConfig {
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| LOCAL_STORAGE_BASE_URL.to_string()),
        };

        let analysis = AnalysisConfig {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            api_base_url: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| ANALYSIS_API_BASE.to_string()),
            model: env::var("ANALYSIS_MODEL").unwrap_or_else(|_| ANALYSIS_MODEL.to_string()),
            temperature: env::var("ANALYSIS_TEMPERATURE")
                .unwrap_or_else(|_| ANALYSIS_TEMPERATURE.to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid ANALYSIS_TEMPERATURE: {}", e))?,
            max_analysis_tokens: env::var("ANALYSIS_MAX_TOKENS")
                .unwrap_or_else(|_| ANALYSIS_MAX_TOKENS.to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid ANALYSIS_MAX_TOKENS: {}", e))?,
            max_followup_tokens: env::var("FOLLOWUP_MAX_TOKENS")
                .unwrap_or_else(|_| FOLLOWUP_MAX_TOKENS.to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid FOLLOWUP_MAX_TOKENS: {}", e))?,
            request_timeout: Duration::from_secs(
                env::var("ANALYSIS_TIMEOUT_SECS")
                    .unwrap_or_else(|_| ANALYSIS_TIMEOUT_SECS.to_string())
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid ANALYSIS_TIMEOUT_SECS: {}", e))?,
            ),
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            storage,
            analysis,
        })
    }
}
