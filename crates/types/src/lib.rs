//! Core types for the Patrimônio360 registry.
//!
//! This crate provides the foundational types used throughout the registry:
//! - Entity kinds, human-readable identifiers, and the entity model
//! - Audit log and trash (soft-delete) records
//! - Document analysis request/report types
//! - Centralized postcard codec
//! - Configuration with validated builders
//! - Domain field validation (postal codes, tax ids, month tags)
//! - Error types using snafu

pub mod analysis;
pub mod audit;
pub mod codec;
pub mod config;
pub mod error;
pub mod trash;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use analysis::{AnalysisContext, AnalysisReport, AnalysisRequest, RiskLevel};
pub use audit::{LogAction, LogEntry, LogScope};
pub use codec::{decode, encode, CodecError};
pub use error::{CoreError, Result};
pub use trash::{EntityRecord, TrashItem};
pub use types::*;
