//! AIC-IF Common Library
//!
//! Shared code for the AIC-IF services including:
//! - The typed citation record and timestamp helpers
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use models::{CitationRecord, NewCitation, SourceType};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
