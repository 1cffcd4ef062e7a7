//! Entity model and identifier types for the registry.
//!
//! Identifiers are human-readable composites of a fixed one-letter kind
//! prefix and a per-kind sequence number (`I_42`). The prefix is a display
//! and namespacing aid only; uniqueness comes from the sequence allocator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::Snafu;

// ============================================================================
// Entity kinds
// ============================================================================

/// The closed set of entity kinds tracked by the registry.
///
/// `Log` participates in id allocation only; it is not a restorable kind and
/// never appears in trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A registered property (building, lot, warehouse).
    Property,
    /// A property owner (person or company).
    Owner,
    /// A stored document, possibly linked to a property.
    Document,
    /// An employee of the managing organization.
    Employee,
    /// A label that properties can reference.
    Tag,
    /// A cloud-storage connection.
    CloudAccount,
    /// An audit log entry.
    Log,
}

impl EntityKind {
    /// Every kind, in stable declaration order.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Property,
        EntityKind::Owner,
        EntityKind::Document,
        EntityKind::Employee,
        EntityKind::Tag,
        EntityKind::CloudAccount,
        EntityKind::Log,
    ];

    /// Returns the fixed one-letter identifier prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Property => 'I',
            Self::Owner => 'P',
            Self::Document => 'D',
            Self::Employee => 'C',
            Self::Tag => 'E',
            Self::CloudAccount => 'N',
            Self::Log => 'L',
        }
    }

    /// Resolves a kind from its identifier prefix.
    #[must_use]
    pub fn from_prefix(prefix: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }

    /// Returns the kind as a static string label for storage keys and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Owner => "owner",
            Self::Document => "document",
            Self::Employee => "employee",
            Self::Tag => "tag",
            Self::CloudAccount => "cloud_account",
            Self::Log => "log",
        }
    }

    /// Returns the single-byte storage tag used in composite table keys.
    ///
    /// Tags are stable: they are persisted inside key bytes and must never be
    /// renumbered.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Property => 0,
            Self::Owner => 1,
            Self::Document => 2,
            Self::Employee => 3,
            Self::Tag => 4,
            Self::CloudAccount => 5,
            Self::Log => 6,
        }
    }

    /// Resolves a kind from its storage tag byte.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Error produced when parsing an identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseIdError {
    /// The string is not of the form `<prefix>_<number>`.
    #[snafu(display("malformed identifier {input:?}: expected <prefix>_<number>"))]
    Malformed {
        /// The rejected input.
        input: String,
    },

    /// The prefix letter does not name a known entity kind.
    #[snafu(display("unknown identifier prefix {prefix:?} in {input:?}"))]
    UnknownPrefix {
        /// The rejected prefix character.
        prefix: char,
        /// The rejected input.
        input: String,
    },
}

/// A human-readable entity identifier: kind prefix plus sequence number.
///
/// Formats as `<prefix>_<seq>`, e.g. `I_42` for the 42nd property. Two ids
/// are equal only if both kind and sequence match, so sequences from
/// different kinds never collide even when numerically equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EntityId {
    kind: EntityKind,
    seq: u64,
}

impl EntityId {
    /// Creates an identifier from a kind and an allocated sequence number.
    #[must_use]
    pub const fn new(kind: EntityKind, seq: u64) -> Self {
        Self { kind, seq }
    }

    /// Returns the entity kind encoded in the prefix.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        self.kind
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.prefix(), self.seq)
    }
}

impl FromStr for EntityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (prefix, rest) = match s.split_once('_') {
            Some((p, rest)) if p.chars().count() == 1 => {
                (p.chars().next().unwrap_or('\0'), rest)
            }
            _ => return MalformedSnafu { input: s }.fail(),
        };

        let kind = EntityKind::from_prefix(prefix)
            .ok_or_else(|| ParseIdError::UnknownPrefix { prefix, input: s.to_string() })?;

        let seq: u64 = rest.parse().map_err(|_| ParseIdError::Malformed { input: s.to_string() })?;

        Ok(Self { kind, seq })
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for EntityId {
    type Error = ParseIdError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Entity model
// ============================================================================

/// A street address with the postal code used for lookup enrichment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// City name.
    pub city: String,
    /// State or region abbreviation.
    pub state: String,
    /// Postal code (CEP), digits only.
    pub postal_code: String,
}

/// A registered property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Identifier (`I_n`).
    pub id: EntityId,
    /// Display name, e.g. "Galpão Norte".
    pub name: String,
    /// Location.
    pub address: Address,
    /// Owning [`Owner`], if assigned.
    pub owner: Option<EntityId>,
    /// Referenced [`Tag`] ids.
    #[serde(default)]
    pub tags: Vec<EntityId>,
    /// Appraised market value, if known.
    pub appraised_value: Option<f64>,
    /// Registration timestamp (UTC).
    pub registered_at: DateTime<Utc>,
}

/// A property owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Identifier (`P_n`).
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Company tax id (CNPJ), digits only, if the owner is a company.
    pub tax_id: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// A stored document, optionally linked to a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier (`D_n`).
    pub id: EntityId,
    /// File or display name.
    pub name: String,
    /// Linked [`Property`], if any.
    pub property: Option<EntityId>,
    /// Category assigned manually or by analysis.
    pub category: String,
    /// Risk classification from analysis.
    pub risk_level: crate::analysis::RiskLevel,
    /// Analysis summary, if the document was analyzed.
    pub summary: Option<String>,
    /// Upload timestamp (UTC).
    pub uploaded_at: DateTime<Utc>,
}

/// An employee of the managing organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier (`C_n`).
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Job role.
    pub role: String,
    /// Contact email.
    pub email: Option<String>,
}

/// A label that properties can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Identifier (`E_n`).
    pub id: EntityId,
    /// Label text.
    pub label: String,
    /// Display color (hex string).
    pub color: String,
}

/// Supported cloud-storage providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudProvider {
    /// Amazon S3 or compatible.
    S3,
    /// Google Cloud Storage.
    Gcs,
    /// Azure Blob Storage.
    Azure,
}

impl CloudProvider {
    /// Returns the provider as a static string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Gcs => "gcs",
            Self::Azure => "azure",
        }
    }
}

/// A cloud-storage connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudAccount {
    /// Identifier (`N_n`).
    pub id: EntityId,
    /// Storage provider.
    pub provider: CloudProvider,
    /// User-facing label.
    pub label: String,
    /// Bucket or container name.
    pub bucket: Option<String>,
}

// ============================================================================
// Monthly economic indices
// ============================================================================

/// One month of economic index readings.
///
/// `date` is a `YYYY-MM` tag; `indices` maps index name (e.g. `"IPCA"`) to
/// its percentage for that month. BTreeMap keeps serialization stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Month tag, `YYYY-MM`.
    pub date: String,
    /// Index name → percentage.
    pub indices: BTreeMap<String, f64>,
}

impl MonthlyRecord {
    /// Creates a record for the given month tag with no readings.
    #[must_use]
    pub fn empty(date: impl Into<String>) -> Self {
        Self { date: date.into(), indices: BTreeMap::new() }
    }
}
