//! Append-only audit ledger with best-effort persistence.
//!
//! Every mutating action is recorded here. The in-memory sequence is
//! updated synchronously (newest first), so readers observe the entry
//! immediately; the durable write happens afterwards and its failure is
//! diagnosed but never reverts the in-memory append or reaches the caller.
//! The audit trail must never block or fail the action it describes.

use chrono::Utc;
use parking_lot::RwLock;
use patrimonio_storage::error::{CommitSnafu, TableSnafu};
use patrimonio_storage::{LogStore, StorageEngine, StoreError, Tables};
use patrimonio_types::{EntityId, EntityKind, LogAction, LogEntry, LogScope};
use snafu::ResultExt;
use tracing::warn;

use crate::allocator::IdAllocator;

/// The audit log: an in-memory newest-first sequence mirrored to storage.
pub struct AuditLedger {
    engine: StorageEngine,
    allocator: IdAllocator,
    user_name: String,
    /// Newest first. Append-only through [`AuditLedger::record`].
    entries: RwLock<Vec<LogEntry>>,
}

impl AuditLedger {
    /// Creates a ledger, loading previously persisted entries.
    ///
    /// A failure loading the persisted log is diagnosed and leaves the
    /// in-memory sequence empty; it never prevents the ledger (or the
    /// registry around it) from starting.
    #[must_use]
    pub fn new(engine: &StorageEngine, allocator: IdAllocator, user_name: impl Into<String>) -> Self {
        let entries = match Self::load(engine) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "failed to load persisted audit log; starting empty");
                Vec::new()
            }
        };

        Self {
            engine: engine.clone(),
            allocator,
            user_name: user_name.into(),
            entries: RwLock::new(entries),
        }
    }

    fn load(engine: &StorageEngine) -> Result<Vec<LogEntry>, StoreError> {
        let txn = engine.read()?;
        let table = txn.open_table(Tables::AUDIT_LOG).context(TableSnafu)?;
        LogStore::list_recent(&table, usize::MAX)
    }

    /// Records one audited mutation.
    ///
    /// Never fails: id allocation and persistence problems are downgraded
    /// to diagnostics so the primary action is never blocked. The returned
    /// entry is already visible at the head of [`AuditLedger::entries`].
    pub fn record(
        &self,
        action: LogAction,
        scope: LogScope,
        description: impl Into<String>,
        details: Option<String>,
    ) -> LogEntry {
        let id = match self.allocator.allocate(EntityKind::Log) {
            Ok(id) => id,
            Err(err) => {
                // Durable counter unavailable; continue with the next
                // in-memory sequence so the trail itself stays intact.
                warn!(error = %err, "log id allocation failed; using in-memory sequence");
                let next = self.entries.read().first().map(|e| e.id.seq()).unwrap_or(0) + 1;
                EntityId::new(EntityKind::Log, next)
            }
        };

        let entry = LogEntry {
            id,
            timestamp: Utc::now(),
            action,
            scope,
            description: description.into(),
            user_name: self.user_name.clone(),
            details,
        };

        self.entries.write().insert(0, entry.clone());

        if let Err(err) = self.persist(&entry) {
            warn!(
                error = %err,
                entry = %entry.id,
                "audit log persistence failed; entry retained in memory only"
            );
        }

        entry
    }

    fn persist(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let txn = self.engine.write()?;
        {
            let mut table = txn.open_table(Tables::AUDIT_LOG).context(TableSnafu)?;
            LogStore::append(&mut table, entry)?;
        }
        txn.commit().context(CommitSnafu)
    }

    /// Returns a snapshot of the log, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// Returns the number of in-memory entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
