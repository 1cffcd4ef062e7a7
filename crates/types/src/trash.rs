//! Trash (soft-delete) types.
//!
//! A deleted entity is captured verbatim as an [`EntityRecord`] before it
//! leaves its live store, so restoration is lossless. The record is a closed
//! union over the restorable kinds: restore dispatch is an exhaustive match,
//! and adding a restorable kind is a compile-time-checked change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    CloudAccount, Document, Employee, EntityId, EntityKind, Owner, Property, Tag,
};

/// A full snapshot of one restorable entity.
///
/// Externally tagged so it stays decodable from postcard bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRecord {
    /// Snapshot of a property.
    Property(Property),
    /// Snapshot of an owner.
    Owner(Owner),
    /// Snapshot of a document.
    Document(Document),
    /// Snapshot of an employee.
    Employee(Employee),
    /// Snapshot of a tag.
    Tag(Tag),
    /// Snapshot of a cloud account.
    CloudAccount(CloudAccount),
}

impl EntityRecord {
    /// Returns the kind of the captured entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Property(_) => EntityKind::Property,
            Self::Owner(_) => EntityKind::Owner,
            Self::Document(_) => EntityKind::Document,
            Self::Employee(_) => EntityKind::Employee,
            Self::Tag(_) => EntityKind::Tag,
            Self::CloudAccount(_) => EntityKind::CloudAccount,
        }
    }

    /// Returns the captured entity's identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Property(p) => p.id,
            Self::Owner(o) => o.id,
            Self::Document(d) => d.id,
            Self::Employee(e) => e.id,
            Self::Tag(t) => t.id,
            Self::CloudAccount(c) => c.id,
        }
    }

    /// Returns the captured entity's display label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Property(p) => &p.name,
            Self::Owner(o) => &o.name,
            Self::Document(d) => &d.name,
            Self::Employee(e) => &e.name,
            Self::Tag(t) => &t.label,
            Self::CloudAccount(c) => &c.label,
        }
    }
}

/// One soft-deleted entity awaiting possible restoration.
///
/// `id` equals the original entity's id (nothing is reallocated), so a
/// restored entity is indistinguishable from one that was never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashItem {
    /// The original entity's identifier.
    pub id: EntityId,
    /// When the delete happened (UTC).
    pub deleted_at: DateTime<Utc>,
    /// Display label captured at delete time.
    pub name: String,
    /// Verbatim snapshot taken before removal from the live store.
    pub record: EntityRecord,
}

impl TrashItem {
    /// Captures a snapshot into a trash item stamped with the given time.
    #[must_use]
    pub fn capture(record: EntityRecord, deleted_at: DateTime<Utc>) -> Self {
        Self {
            id: record.id(),
            deleted_at,
            name: record.display_name().to_string(),
            record,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn sample_property() -> Property {
        Property {
            id: EntityId::new(EntityKind::Property, 2),
            name: "Galpão".to_string(),
            address: Address::default(),
            owner: None,
            tags: Vec::new(),
            appraised_value: None,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_kind_and_id() {
        let record = EntityRecord::Property(sample_property());
        assert_eq!(record.kind(), EntityKind::Property);
        assert_eq!(record.id(), EntityId::new(EntityKind::Property, 2));
        assert_eq!(record.display_name(), "Galpão");
    }

    #[test]
    fn test_capture_preserves_id_and_name() {
        let property = sample_property();
        let item = TrashItem::capture(EntityRecord::Property(property.clone()), Utc::now());

        assert_eq!(item.id, property.id);
        assert_eq!(item.name, "Galpão");
        assert_eq!(item.record, EntityRecord::Property(property));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = EntityRecord::Tag(Tag {
            id: EntityId::new(EntityKind::Tag, 1),
            label: "Comercial".to_string(),
            color: "#1f6f43".to_string(),
        });
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"tag\""));

        let back: EntityRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn test_trash_item_serde_roundtrip() {
        let item = TrashItem::capture(EntityRecord::Property(sample_property()), Utc::now());
        let json = serde_json::to_string(&item).expect("serialize");
        let back: TrashItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, item);
    }
}
