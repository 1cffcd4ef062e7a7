//! Registry error types.

use std::path::PathBuf;

use patrimonio_storage::StoreError;
use patrimonio_types::config::ConfigError;
use patrimonio_types::validation::ValidationError;
use patrimonio_types::{EntityId, EntityKind};
use snafu::Snafu;

/// Errors produced by registry operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RegistryError {
    /// The storage layer failed; nothing was changed.
    #[snafu(display("Storage error: {source}"), context(false))]
    Store {
        /// The underlying storage error.
        source: StoreError,
    },

    /// The entity is not in its live store.
    #[snafu(display("no live entity with id {id}"))]
    NotFound {
        /// The missing id.
        id: EntityId,
    },

    /// The trash holds no item with this id.
    #[snafu(display("no trash item with id {id}"))]
    TrashMissing {
        /// The missing id.
        id: EntityId,
    },

    /// A built record did not carry the id allocated for it.
    #[snafu(display("record id {found} does not match allocated id {expected}"))]
    IdMismatch {
        /// The id the registry allocated.
        expected: EntityId,
        /// The id the record carried.
        found: EntityId,
    },

    /// An operation was invoked for a kind it does not support.
    #[snafu(display("operation does not apply to kind {kind}"))]
    UnsupportedKind {
        /// The rejected kind.
        kind: EntityKind,
    },

    /// A domain field failed validation; nothing was persisted.
    #[snafu(display("Validation error: {source}"), context(false))]
    Validation {
        /// The validation error.
        source: ValidationError,
    },

    /// Configuration is invalid.
    #[snafu(display("Config error: {source}"), context(false))]
    Config {
        /// The config error.
        source: ConfigError,
    },

    /// The data directory could not be prepared.
    #[snafu(display("I/O error at {}: {source}", path.display()))]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
