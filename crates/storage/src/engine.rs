//! redb storage engine wrapper.
//!
//! Provides a thin wrapper around redb with:
//! - Database lifecycle management
//! - Convenient file and in-memory constructors
//! - Table creation on open, so read transactions never race table existence

use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadTransaction, WriteTransaction};
use snafu::ResultExt;

use crate::error::{CommitSnafu, OpenSnafu, Result, TableSnafu, TransactionSnafu};
use crate::tables::Tables;

/// Storage engine wrapping a shared redb database handle.
///
/// File-based for normal use; [`StorageEngine::open_in_memory`] backs the
/// same API with an in-memory store for tests.
pub struct StorageEngine {
    db: Arc<Database>,
}

impl StorageEngine {
    /// Opens or creates a database at the given path.
    ///
    /// All registry tables are created up front so that subsequent read
    /// transactions can open them unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`](crate::StoreError::Open) if the file
    /// cannot be opened or created, or a transaction/commit error from the
    /// initial table setup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path).context(OpenSnafu { path: path.display().to_string() })?;

        let engine = Self { db: Arc::new(db) };
        engine.ensure_tables()?;
        Ok(engine)
    }

    /// Creates a new in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`](crate::StoreError::Open) if the backend
    /// cannot be initialized.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .context(OpenSnafu { path: ":memory:".to_string() })?;

        let engine = Self { db: Arc::new(db) };
        engine.ensure_tables()?;
        Ok(engine)
    }

    /// Gets a clone of the database handle.
    #[must_use]
    pub fn db(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Begins a read transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](crate::StoreError::Transaction)
    /// if the transaction cannot be started.
    pub fn read(&self) -> Result<ReadTransaction> {
        self.db.begin_read().context(TransactionSnafu)
    }

    /// Begins a write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transaction`](crate::StoreError::Transaction)
    /// if the transaction cannot be started.
    pub fn write(&self) -> Result<WriteTransaction> {
        self.db.begin_write().context(TransactionSnafu)
    }

    /// Creates every registry table if it does not already exist.
    fn ensure_tables(&self) -> Result<()> {
        let txn = self.db.begin_write().context(TransactionSnafu)?;
        {
            txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
            txn.open_table(Tables::TRASH).context(TableSnafu)?;
            txn.open_table(Tables::AUDIT_LOG).context(TableSnafu)?;
            txn.open_table(Tables::SEQUENCES).context(TableSnafu)?;
            txn.open_table(Tables::INDICES).context(TableSnafu)?;
        }
        txn.commit().context(CommitSnafu)
    }
}

impl Clone for StorageEngine {
    fn clone(&self) -> Self {
        Self { db: Arc::clone(&self.db) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let engine = StorageEngine::open_in_memory().expect("should open");
        let db = engine.db();
        let _read = db.begin_read().expect("should begin read");
        let _write = db.begin_write().expect("should begin write");
    }

    #[test]
    fn test_tables_exist_after_open() {
        let engine = StorageEngine::open_in_memory().expect("should open");
        let db = engine.db();

        // A fresh read transaction can open every table without a write ever
        // having touched it.
        let txn = db.begin_read().expect("begin read");
        txn.open_table(Tables::ENTITIES).expect("entities");
        txn.open_table(Tables::TRASH).expect("trash");
        txn.open_table(Tables::AUDIT_LOG).expect("audit_log");
        txn.open_table(Tables::SEQUENCES).expect("sequences");
        txn.open_table(Tables::INDICES).expect("indices");
    }

    #[test]
    fn test_write_and_read() {
        let engine = StorageEngine::open_in_memory().expect("should open");
        let db = engine.db();

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::ENTITIES).expect("open");
                table.insert(&b"test_key"[..], &b"test_value"[..]).expect("insert");
            }
            txn.commit().expect("commit");
        }

        {
            let txn = db.begin_read().expect("begin read");
            let table = txn.open_table(Tables::ENTITIES).expect("open");
            let value = table.get(&b"test_key"[..]).expect("get");
            assert_eq!(value.expect("present").value(), b"test_value");
        }
    }

    #[test]
    fn test_open_file_backed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("registry.redb");

        {
            let engine = StorageEngine::open(&path).expect("create");
            let db = engine.db();
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::SEQUENCES).expect("open");
                table.insert("property", &5u64).expect("insert");
            }
            txn.commit().expect("commit");
        }

        // Reopen and observe the persisted value.
        let engine = StorageEngine::open(&path).expect("reopen");
        let db = engine.db();
        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::SEQUENCES).expect("open");
        let value = table.get("property").expect("get").expect("present");
        assert_eq!(value.value(), 5);
    }
}
