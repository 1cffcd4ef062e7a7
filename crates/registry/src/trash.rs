//! Soft delete and restore.
//!
//! A delete snapshots the entity into trash and removes it from the live
//! store inside one storage transaction, so a failure leaves both stores
//! untouched. Deleting a tag additionally strips its id from every property
//! that references it, in the same transaction. Restore is the inverse:
//! the snapshot is reinserted and the trash entry removed atomically, and a
//! failed reinsertion leaves the item recoverable in trash.
//!
//! The only exit from trash is a restore; items otherwise accumulate
//! indefinitely.

use chrono::Utc;
use patrimonio_storage::error::{CommitSnafu, TableSnafu};
use patrimonio_storage::{EntityStore, TrashStore, Tables};
use patrimonio_types::{
    EntityId, EntityKind, EntityRecord, LogAction, Property, TrashItem,
};
use snafu::ResultExt;

use crate::error::{RegistryError, Result};
use crate::registry::{kind_label, scope_for, Registry};

impl Registry {
    /// Soft-deletes a live entity into trash.
    ///
    /// Returns the trash item holding the verbatim snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the entity is not live,
    /// [`RegistryError::UnsupportedKind`] for the `Log` kind, or a storage
    /// error. In every failure case the entity is still live and trash is
    /// unchanged.
    pub fn soft_delete(&self, id: EntityId) -> Result<TrashItem> {
        if id.kind() == EntityKind::Log {
            return Err(RegistryError::UnsupportedKind { kind: id.kind() });
        }

        let txn = self.engine.write()?;
        let item;
        let mut cascaded: Vec<Property> = Vec::new();
        {
            let mut entities = txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
            let mut trash = txn.open_table(Tables::TRASH).context(TableSnafu)?;

            let record =
                EntityStore::get(&entities, id)?.ok_or(RegistryError::NotFound { id })?;

            // Snapshot strictly before removal, so restoration is lossless.
            item = TrashItem::capture(record, Utc::now());
            TrashStore::put(&mut trash, &item)?;
            EntityStore::delete(&mut entities, id)?;

            if id.kind() == EntityKind::Tag {
                let properties = EntityStore::list_kind(&entities, EntityKind::Property)?;
                for property_record in properties {
                    if let EntityRecord::Property(mut property) = property_record {
                        if property.tags.contains(&id) {
                            property.tags.retain(|tag| *tag != id);
                            EntityStore::set(
                                &mut entities,
                                &EntityRecord::Property(property.clone()),
                            )?;
                            cascaded.push(property);
                        }
                    }
                }
            }
        }
        txn.commit().context(CommitSnafu)?;

        self.cache_remove(id);
        for property in cascaded {
            self.cache_upsert(EntityRecord::Property(property));
        }
        self.caches.trash.write().insert(0, item.clone());

        self.ledger.record(
            LogAction::Delete,
            scope_for(id.kind()),
            format!("Exclusão de {} '{}'", kind_label(id.kind()), item.name),
            None,
        );

        Ok(item)
    }

    /// Restores a trashed entity into its live store.
    ///
    /// After success the entity is field-identical to the original (same
    /// id, same snapshot) and no longer appears in trash.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TrashMissing`] if no trash item carries the
    /// id, or a storage error. Either way the item remains in trash and
    /// stays recoverable.
    pub fn restore(&self, id: EntityId) -> Result<EntityRecord> {
        let txn = self.engine.write()?;
        let item;
        {
            let mut entities = txn.open_table(Tables::ENTITIES).context(TableSnafu)?;
            let mut trash = txn.open_table(Tables::TRASH).context(TableSnafu)?;

            item = TrashStore::get(&trash, id)?.ok_or(RegistryError::TrashMissing { id })?;

            EntityStore::set(&mut entities, &item.record)?;
            TrashStore::remove(&mut trash, id)?;
        }
        txn.commit().context(CommitSnafu)?;

        self.caches.trash.write().retain(|t| t.id != id);
        self.cache_upsert(item.record.clone());

        self.ledger.record(
            LogAction::Restore,
            scope_for(id.kind()),
            format!("Restauração de {} '{}'", kind_label(id.kind()), item.name),
            None,
        );

        Ok(item.record)
    }
}
