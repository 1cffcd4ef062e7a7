//! Sequential id allocation backed by durable per-kind counters.
//!
//! `allocate` reads the last issued sequence number for a kind, writes the
//! increment, and commits; the id is handed out only after the counter
//! update is durable. A failed commit returns an error and no identifier,
//! so an id whose uniqueness is not backed by storage is never observed.
//!
//! Counters are created lazily (an absent row reads as 0, so the first id
//! of every kind is `<prefix>_1`), never decremented, and survive restarts
//! with the database file.

use patrimonio_storage::error::{CommitSnafu, TableSnafu};
use patrimonio_storage::{SequenceStore, StorageEngine, Tables};
use patrimonio_types::{EntityId, EntityKind};
use snafu::ResultExt;

use crate::error::Result;

/// Issues unique, monotonically increasing ids per entity kind.
#[derive(Clone)]
pub struct IdAllocator {
    engine: StorageEngine,
}

impl IdAllocator {
    /// Creates an allocator over the engine's database handle.
    #[must_use]
    pub fn new(engine: &StorageEngine) -> Self {
        Self { engine: engine.clone() }
    }

    /// Allocates the next identifier for a kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if the
    /// counter increment cannot be made durable. No identifier is returned
    /// in that case.
    pub fn allocate(&self, kind: EntityKind) -> Result<EntityId> {
        let txn = self.engine.write()?;
        let next;
        {
            let mut table = txn.open_table(Tables::SEQUENCES).context(TableSnafu)?;
            next = SequenceStore::current(&table, kind)? + 1;
            SequenceStore::set(&mut table, kind, next)?;
        }
        txn.commit().context(CommitSnafu)?;

        Ok(EntityId::new(kind, next))
    }

    /// Returns the last issued sequence number for a kind (0 if none).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if the
    /// read fails.
    pub fn last_issued(&self, kind: EntityKind) -> Result<u64> {
        let txn = self.engine.read()?;
        let table = txn.open_table(Tables::SEQUENCES).context(TableSnafu)?;
        Ok(SequenceStore::current(&table, kind)?)
    }

    /// Clears every counter. Administrative-only.
    ///
    /// After this, allocation restarts from 1 for every kind: ids already
    /// issued to existing entities WILL be reissued. Never call this from a
    /// normal application flow.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if the
    /// clear cannot be committed.
    pub fn reset_counters(&self) -> Result<()> {
        let txn = self.engine.write()?;
        {
            let mut table = txn.open_table(Tables::SEQUENCES).context(TableSnafu)?;
            SequenceStore::clear(&mut table)?;
        }
        txn.commit().context(CommitSnafu)?;
        Ok(())
    }
}
