//! Registry core for Patrimônio360.
//!
//! This crate sits between the raw storage layer (`patrimonio-storage`) and
//! the application handlers, providing:
//!
//! - Sequential, human-readable id allocation with durable counters
//! - An append-only audit ledger with best-effort persistence
//! - Soft delete into trash and lossless restore, with the tag cascade
//! - Monthly economic-index merging
//! - A façade ([`Registry`]) composing all of the above with explicit
//!   in-memory caches

mod allocator;
mod error;
mod ledger;
mod merge;
mod registry;
mod trash;

pub use allocator::IdAllocator;
pub use error::{RegistryError, Result};
pub use ledger::AuditLedger;
pub use merge::merge_indices;
pub use registry::Registry;
