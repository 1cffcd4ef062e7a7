//! External provider seams for Patrimônio360.
//!
//! Document analysis and public reference lookups (address by postal code,
//! company registry by tax id, economic index series) are delegated to
//! external services. This crate defines the trait seams, the resilience
//! wrappers around them (bounded timeouts, retry with exponential backoff,
//! and graceful degradation to safe defaults), and in-memory mocks for
//! tests.
//!
//! The containment contract: a provider failure never aborts the user
//! action that triggered the call. Analysis substitutes the neutral
//! fallback report, enrichment lookups skip silently, and index history
//! falls back from primary to secondary source to locally synthesized
//! placeholder data.

mod analysis;
mod error;
pub mod mock;
mod reference;
mod retry;

pub use analysis::{DocumentAnalyzer, ResilientAnalyzer};
pub use error::{ProviderError, Result};
pub use reference::{
    enrich_address, enrich_company, AddressSource, CompanyInfo, CompanySource,
    FallbackIndexSource, IndexSource,
};
pub use retry::with_retry;
