//! Table definitions for redb storage.
//!
//! Byte-array keys and values except where a fixed-width key is natural.
//! Key encoding is handled by the keys module; values are postcard bytes
//! produced by the central codec.

use redb::TableDefinition;

/// Table definitions for registry storage.
pub struct Tables;

impl Tables {
    /// Live entity storage: composite key → serialized EntityRecord.
    /// Key format: {kind_tag:1}{seq:8BE}
    pub const ENTITIES: TableDefinition<'static, &'static [u8], &'static [u8]> =
        TableDefinition::new("entities");

    /// Soft-deleted entities: composite key → serialized TrashItem.
    /// Key format matches `ENTITIES` so an id addresses both tables.
    pub const TRASH: TableDefinition<'static, &'static [u8], &'static [u8]> =
        TableDefinition::new("trash");

    /// Audit log: log sequence number → serialized LogEntry.
    /// Ascending key order is chronological order.
    pub const AUDIT_LOG: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("audit_log");

    /// Sequence counters: kind label → last issued sequence number.
    pub const SEQUENCES: TableDefinition<'static, &'static str, u64> =
        TableDefinition::new("sequences");

    /// Monthly economic indices: "YYYY-MM" tag → serialized MonthlyRecord.
    /// Lexicographic key order is chronological order.
    pub const INDICES: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("indices");
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::TableHandle;

    #[test]
    fn test_table_names_unique() {
        let names = [
            Tables::ENTITIES.name(),
            Tables::TRASH.name(),
            Tables::AUDIT_LOG.name(),
            Tables::SEQUENCES.name(),
            Tables::INDICES.name(),
        ];

        let mut sorted = names.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len(), "Table names must be unique");
    }
}
