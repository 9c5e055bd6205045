//! Lexfile Analysis Library
//!
//! Prompt budgeting and the client for the external reasoning service. The
//! client never fails the surrounding upload flow: every failure mode maps to
//! a typed [`AnalysisFailure`] whose rendering is itself presentable,
//! storable text.

pub mod client;
pub mod prompt;
pub mod transport;

pub use client::{AnalysisClient, AnalysisFailure, AnalysisOutcome};
pub use prompt::{
    build_analysis_prompt, build_followup_prompt, ANALYSIS_CHAR_LIMIT, FOLLOWUP_CHAR_LIMIT,
};
pub use transport::{ChatRequest, ChatTransport, HttpChatTransport};
