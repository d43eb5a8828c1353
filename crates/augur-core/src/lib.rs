//! Core types, configuration, and error handling for the Augur workspace.
//!
//! This crate provides the shared foundation used by the other Augur crates:
//! - [`AugurError`] — unified error type using `thiserror`, with the
//!   size-limit / schema / transport / input failure classes as variants
//! - [`AugurConfig`] — configuration loaded from `.augur.toml`
//! - The assessment data model: [`RiskLevel`], [`MigrationRisk`],
//!   [`RiskAssessment`]
//! - [`OutputFormat`] for CLI rendering

mod config;
mod error;
mod types;

pub use config::{AnalysisConfig, AugurConfig, LlmConfig};
pub use error::AugurError;
pub use types::{MigrationRisk, OutputFormat, RiskAssessment, RiskLevel};

/// A convenience `Result` type for Augur operations.
pub type Result<T> = std::result::Result<T, AugurError>;
