//! Audit log storage operations.
//!
//! Entries are keyed by their log sequence number, so ascending key order is
//! chronological and a reverse scan yields newest-first. Nothing here
//! mutates or removes existing entries.

use patrimonio_types::{decode, encode, LogEntry};
use redb::{ReadableTable, Table};
use snafu::ResultExt;

use crate::error::{CodecSnafu, Result, StorageSnafu};

/// Audit log storage operations.
pub struct LogStore;

impl LogStore {
    /// Appends a log entry keyed by its allocated sequence number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` if serialization fails, or
    /// `StoreError::Storage` if the write fails.
    pub fn append(table: &mut Table<'_, u64, &'static [u8]>, entry: &LogEntry) -> Result<()> {
        let encoded = encode(entry).context(CodecSnafu)?;
        table.insert(entry.id.seq(), &encoded[..]).context(StorageSnafu)?;
        Ok(())
    }

    /// Returns a log entry by sequence number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails, or
    /// `StoreError::Codec` if the stored bytes do not decode.
    pub fn get(table: &impl ReadableTable<u64, &'static [u8]>, seq: u64) -> Result<Option<LogEntry>> {
        match table.get(seq).context(StorageSnafu)? {
            Some(data) => {
                let entry = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Lists entries newest-first, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the scan fails, or
    /// `StoreError::Codec` if any stored value does not decode.
    pub fn list_recent(
        table: &impl ReadableTable<u64, &'static [u8]>,
        limit: usize,
    ) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();

        for result in table.iter().context(StorageSnafu)?.rev() {
            if entries.len() >= limit {
                break;
            }
            let (_, value) = result.context(StorageSnafu)?;
            let entry = decode(value.value()).context(CodecSnafu)?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Counts stored entries.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails.
    pub fn count(table: &impl ReadableTable<u64, &'static [u8]>) -> Result<u64> {
        table.len().context(StorageSnafu)
    }
}
