//! Trash storage operations.
//!
//! Keyed identically to the entities table, so the id captured at delete
//! time addresses the snapshot directly.

use patrimonio_types::{decode, encode, EntityId, TrashItem};
use redb::{ReadableTable, Table};
use snafu::ResultExt;

use crate::error::{CodecSnafu, Result, StorageSnafu};
use crate::keys::encode_entity_key;

/// Trash storage operations.
pub struct TrashStore;

impl TrashStore {
    /// Inserts a trash item keyed by the deleted entity's id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` if serialization fails, or
    /// `StoreError::Storage` if the write fails.
    pub fn put(
        table: &mut Table<'_, &'static [u8], &'static [u8]>,
        item: &TrashItem,
    ) -> Result<()> {
        let key = encode_entity_key(item.id);
        let encoded = encode(item).context(CodecSnafu)?;

        table.insert(&key[..], &encoded[..]).context(StorageSnafu)?;
        Ok(())
    }

    /// Returns a trash item by the deleted entity's id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails, or
    /// `StoreError::Codec` if the stored bytes do not decode.
    pub fn get(
        table: &impl ReadableTable<&'static [u8], &'static [u8]>,
        id: EntityId,
    ) -> Result<Option<TrashItem>> {
        let key = encode_entity_key(id);

        match table.get(&key[..]).context(StorageSnafu)? {
            Some(data) => {
                let item = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    /// Removes a trash item. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the delete fails.
    pub fn remove(
        table: &mut Table<'_, &'static [u8], &'static [u8]>,
        id: EntityId,
    ) -> Result<bool> {
        let key = encode_entity_key(id);
        let existed = table.remove(&key[..]).context(StorageSnafu)?;
        Ok(existed.is_some())
    }

    /// Lists every trash item in key order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the scan fails, or
    /// `StoreError::Codec` if any stored value does not decode.
    pub fn list(
        table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    ) -> Result<Vec<TrashItem>> {
        let mut items = Vec::new();

        for result in table.iter().context(StorageSnafu)? {
            let (_, value) = result.context(StorageSnafu)?;
            let item = decode(value.value()).context(CodecSnafu)?;
            items.push(item);
        }

        Ok(items)
    }
}
