//! Storage error types.

use patrimonio_types::CodecError;
use snafu::Snafu;

/// Errors produced by the storage layer.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// Database file could not be opened or created.
    #[snafu(display("Failed to open database at {path}: {source}"))]
    Open {
        /// Path that failed to open.
        path: String,
        /// The underlying redb error.
        source: redb::DatabaseError,
    },

    /// A read or write on a table failed.
    #[snafu(display("Storage error: {source}"))]
    Storage {
        /// The underlying redb error.
        source: redb::StorageError,
    },

    /// A table could not be opened.
    #[snafu(display("Table error: {source}"))]
    Table {
        /// The underlying redb error.
        source: redb::TableError,
    },

    /// A transaction could not be started.
    #[snafu(display("Transaction error: {source}"))]
    Transaction {
        /// The underlying redb error.
        source: redb::TransactionError,
    },

    /// A transaction failed to commit.
    #[snafu(display("Commit error: {source}"))]
    Commit {
        /// The underlying redb error.
        source: redb::CommitError,
    },

    /// Serialization or deserialization of a stored value failed.
    #[snafu(display("Codec error: {source}"))]
    Codec {
        /// The codec error.
        source: CodecError,
    },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
