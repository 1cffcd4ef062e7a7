//! Live entity storage operations.
//!
//! Stateless CRUD on the entities table. All operations take a table
//! reference so callers control transaction boundaries; getters accept any
//! readable table so they work inside both read and write transactions.

use patrimonio_types::{decode, encode, EntityId, EntityKind, EntityRecord};
use redb::{ReadableTable, Table};
use snafu::ResultExt;

use crate::error::{CodecSnafu, Result, StorageSnafu};
use crate::keys::{encode_entity_key, kind_range_start};

/// Entity storage operations.
pub struct EntityStore;

impl EntityStore {
    /// Returns an entity snapshot by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails, or
    /// `StoreError::Codec` if the stored bytes do not decode.
    pub fn get(
        table: &impl ReadableTable<&'static [u8], &'static [u8]>,
        id: EntityId,
    ) -> Result<Option<EntityRecord>> {
        let key = encode_entity_key(id);

        match table.get(&key[..]).context(StorageSnafu)? {
            Some(data) => {
                let record = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Inserts or overwrites an entity snapshot keyed by its own id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` if serialization fails, or
    /// `StoreError::Storage` if the write fails.
    pub fn set(
        table: &mut Table<'_, &'static [u8], &'static [u8]>,
        record: &EntityRecord,
    ) -> Result<()> {
        let key = encode_entity_key(record.id());
        let encoded = encode(record).context(CodecSnafu)?;

        table.insert(&key[..], &encoded[..]).context(StorageSnafu)?;
        Ok(())
    }

    /// Deletes an entity. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the delete fails.
    pub fn delete(
        table: &mut Table<'_, &'static [u8], &'static [u8]>,
        id: EntityId,
    ) -> Result<bool> {
        let key = encode_entity_key(id);
        let existed = table.remove(&key[..]).context(StorageSnafu)?;
        Ok(existed.is_some())
    }

    /// Checks whether an entity exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails.
    pub fn exists(
        table: &impl ReadableTable<&'static [u8], &'static [u8]>,
        id: EntityId,
    ) -> Result<bool> {
        let key = encode_entity_key(id);
        Ok(table.get(&key[..]).context(StorageSnafu)?.is_some())
    }

    /// Lists all entities of one kind in allocation order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the scan fails, or
    /// `StoreError::Codec` if any stored value does not decode.
    pub fn list_kind(
        table: &impl ReadableTable<&'static [u8], &'static [u8]>,
        kind: EntityKind,
    ) -> Result<Vec<EntityRecord>> {
        let start = kind_range_start(kind);
        let mut records = Vec::new();

        for result in table.range(&start[..]..).context(StorageSnafu)? {
            let (key, value) = result.context(StorageSnafu)?;
            // Keys group by kind tag; past the tag we are done.
            if key.value().first() != Some(&kind.tag()) {
                break;
            }
            let record = decode(value.value()).context(CodecSnafu)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Counts entities of one kind.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the scan fails.
    pub fn count_kind(
        table: &impl ReadableTable<&'static [u8], &'static [u8]>,
        kind: EntityKind,
    ) -> Result<usize> {
        let start = kind_range_start(kind);
        let mut count = 0;

        for result in table.range(&start[..]..).context(StorageSnafu)? {
            let (key, _) = result.context(StorageSnafu)?;
            if key.value().first() != Some(&kind.tag()) {
                break;
            }
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::StorageEngine;
    use crate::tables::Tables;
    use patrimonio_types::{Owner, Tag};

    fn owner(seq: u64, name: &str) -> EntityRecord {
        EntityRecord::Owner(Owner {
            id: EntityId::new(EntityKind::Owner, seq),
            name: name.to_string(),
            tax_id: None,
            email: None,
            phone: None,
        })
    }

    fn tag(seq: u64, label: &str) -> EntityRecord {
        EntityRecord::Tag(Tag {
            id: EntityId::new(EntityKind::Tag, seq),
            label: label.to_string(),
            color: "#336699".to_string(),
        })
    }

    #[test]
    fn test_entity_crud() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();
        let record = owner(1, "Imobiliária Central");

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::ENTITIES).expect("open");
                EntityStore::set(&mut table, &record).expect("set");
            }
            txn.commit().expect("commit");
        }

        {
            let txn = db.begin_read().expect("begin read");
            let table = txn.open_table(Tables::ENTITIES).expect("open");

            let loaded = EntityStore::get(&table, record.id())
                .expect("get")
                .expect("entity should exist");
            assert_eq!(loaded, record);
            assert!(EntityStore::exists(&table, record.id()).expect("exists"));
        }

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::ENTITIES).expect("open");
                assert!(EntityStore::delete(&mut table, record.id()).expect("delete"));
            }
            txn.commit().expect("commit");
        }

        {
            let txn = db.begin_read().expect("begin read");
            let table = txn.open_table(Tables::ENTITIES).expect("open");
            assert!(EntityStore::get(&table, record.id()).expect("get").is_none());
        }
    }

    #[test]
    fn test_delete_nonexistent_returns_false() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        let txn = db.begin_write().expect("begin write");
        {
            let mut table = txn.open_table(Tables::ENTITIES).expect("open");
            let deleted = EntityStore::delete(&mut table, EntityId::new(EntityKind::Owner, 99))
                .expect("delete");
            assert!(!deleted);
        }
        txn.commit().expect("commit");
    }

    #[test]
    fn test_list_kind_isolates_kinds() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::ENTITIES).expect("open");
                EntityStore::set(&mut table, &owner(1, "Alfa")).expect("set");
                EntityStore::set(&mut table, &owner(2, "Beta")).expect("set");
                EntityStore::set(&mut table, &tag(1, "Comercial")).expect("set");
            }
            txn.commit().expect("commit");
        }

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::ENTITIES).expect("open");

        let owners = EntityStore::list_kind(&table, EntityKind::Owner).expect("list");
        assert_eq!(owners.len(), 2);
        assert!(owners.iter().all(|r| r.kind() == EntityKind::Owner));

        let tags = EntityStore::list_kind(&table, EntityKind::Tag).expect("list");
        assert_eq!(tags.len(), 1);

        assert_eq!(EntityStore::count_kind(&table, EntityKind::Owner).expect("count"), 2);
        assert_eq!(EntityStore::count_kind(&table, EntityKind::Property).expect("count"), 0);
    }

    #[test]
    fn test_list_kind_allocation_order() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::ENTITIES).expect("open");
                // Insert out of order; the scan must come back ordered.
                EntityStore::set(&mut table, &owner(3, "C")).expect("set");
                EntityStore::set(&mut table, &owner(1, "A")).expect("set");
                EntityStore::set(&mut table, &owner(2, "B")).expect("set");
            }
            txn.commit().expect("commit");
        }

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::ENTITIES).expect("open");
        let owners = EntityStore::list_kind(&table, EntityKind::Owner).expect("list");
        let seqs: Vec<u64> = owners.iter().map(|r| r.id().seq()).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }
}
