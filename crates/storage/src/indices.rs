//! Monthly economic index storage operations.
//!
//! One row per month, keyed by the `YYYY-MM` tag. Lexicographic key order
//! is chronological order, so a reverse scan yields most-recent-first.

use patrimonio_types::{decode, encode, MonthlyRecord};
use redb::{ReadableTable, Table};
use snafu::ResultExt;

use crate::error::{CodecSnafu, Result, StorageSnafu};

/// Monthly index storage operations.
pub struct IndexStore;

impl IndexStore {
    /// Inserts or overwrites records keyed by their month tag.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` if serialization fails, or
    /// `StoreError::Storage` if a write fails.
    pub fn upsert(
        table: &mut Table<'_, &'static str, &'static [u8]>,
        records: &[MonthlyRecord],
    ) -> Result<()> {
        for record in records {
            let encoded = encode(record).context(CodecSnafu)?;
            table.insert(record.date.as_str(), &encoded[..]).context(StorageSnafu)?;
        }
        Ok(())
    }

    /// Returns the record for one month tag.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails, or
    /// `StoreError::Codec` if the stored bytes do not decode.
    pub fn get(
        table: &impl ReadableTable<&'static str, &'static [u8]>,
        date: &str,
    ) -> Result<Option<MonthlyRecord>> {
        match table.get(date).context(StorageSnafu)? {
            Some(data) => {
                let record = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Lists every record most-recent-month first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the scan fails, or
    /// `StoreError::Codec` if any stored value does not decode.
    pub fn list_desc(
        table: &impl ReadableTable<&'static str, &'static [u8]>,
    ) -> Result<Vec<MonthlyRecord>> {
        let mut records = Vec::new();

        for result in table.iter().context(StorageSnafu)?.rev() {
            let (_, value) = result.context(StorageSnafu)?;
            let record = decode(value.value()).context(CodecSnafu)?;
            records.push(record);
        }

        Ok(records)
    }
}
