//! Sequence counter storage operations.
//!
//! One row per entity kind, keyed by the kind label, holding the last
//! issued sequence number. An absent row reads as 0, so counters are
//! created lazily on first allocation.

use patrimonio_types::EntityKind;
use redb::{ReadableTable, Table};
use snafu::ResultExt;

use crate::error::{Result, StorageSnafu};

/// Sequence counter storage operations.
pub struct SequenceStore;

impl SequenceStore {
    /// Returns the last issued sequence number for a kind (0 if never used).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails.
    pub fn current(
        table: &impl ReadableTable<&'static str, u64>,
        kind: EntityKind,
    ) -> Result<u64> {
        let value = table
            .get(kind.as_str())
            .context(StorageSnafu)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        Ok(value)
    }

    /// Stores the last issued sequence number for a kind.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the write fails.
    pub fn set(table: &mut Table<'_, &'static str, u64>, kind: EntityKind, value: u64) -> Result<()> {
        table.insert(kind.as_str(), value).context(StorageSnafu)?;
        Ok(())
    }

    /// Removes every counter row.
    ///
    /// Subsequent reads see 0 for every kind, so allocation restarts from 1.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if a delete fails.
    pub fn clear(table: &mut Table<'_, &'static str, u64>) -> Result<()> {
        for kind in EntityKind::ALL {
            table.remove(kind.as_str()).context(StorageSnafu)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::StorageEngine;
    use crate::tables::Tables;

    #[test]
    fn test_absent_counter_reads_zero() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::SEQUENCES).expect("open");
        assert_eq!(SequenceStore::current(&table, EntityKind::Property).expect("current"), 0);
    }

    #[test]
    fn test_set_then_current() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::SEQUENCES).expect("open");
                SequenceStore::set(&mut table, EntityKind::Document, 7).expect("set");
            }
            txn.commit().expect("commit");
        }

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::SEQUENCES).expect("open");
        assert_eq!(SequenceStore::current(&table, EntityKind::Document).expect("current"), 7);
        // Other kinds are untouched.
        assert_eq!(SequenceStore::current(&table, EntityKind::Owner).expect("current"), 0);
    }

    #[test]
    fn test_clear_resets_every_kind() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::SEQUENCES).expect("open");
                for kind in EntityKind::ALL {
                    SequenceStore::set(&mut table, kind, 10).expect("set");
                }
                SequenceStore::clear(&mut table).expect("clear");
            }
            txn.commit().expect("commit");
        }

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::SEQUENCES).expect("open");
        for kind in EntityKind::ALL {
            assert_eq!(SequenceStore::current(&table, kind).expect("current"), 0);
        }
    }
}
