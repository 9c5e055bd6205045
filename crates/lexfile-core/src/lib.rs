//! Lexfile Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all Lexfile components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AnalysisConfig, Config, StorageConfig};
pub use error::AppError;
pub use models::{DocumentRecord, NewDocument};
