//! Audit log types.
//!
//! Every mutating action on a tracked entity produces a [`LogEntry`]: who did
//! what, to which kind of entity, and when. Entries are append-only: nothing
//! in the normal flows mutates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// The audited action categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    /// An entity was created.
    Create,
    /// An entity was overwritten with new field values.
    Update,
    /// An entity was soft-deleted into trash.
    Delete,
    /// An entity was restored from trash.
    Restore,
    /// A document analysis result was registered.
    Analysis,
}

impl LogAction {
    /// Returns the action as a static string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::Analysis => "analysis",
        }
    }
}

/// What part of the registry a log entry describes.
///
/// `System` covers actions with no single entity target (index refreshes,
/// counter resets, configuration changes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogScope {
    /// Property registry.
    Property,
    /// Document registry.
    Document,
    /// Owner registry.
    Owner,
    /// Employee registry.
    Employee,
    /// Tag registry.
    Tag,
    /// Registry-wide or administrative action.
    System,
}

impl LogScope {
    /// Returns the scope as a static string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Document => "document",
            Self::Owner => "owner",
            Self::Employee => "employee",
            Self::Tag => "tag",
            Self::System => "system",
        }
    }
}

/// One audited mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Identifier allocated from the `Log` sequence (`L_n`).
    pub id: EntityId,
    /// When the action occurred (UTC).
    pub timestamp: DateTime<Utc>,
    /// What was done.
    pub action: LogAction,
    /// Which part of the registry it touched.
    pub scope: LogScope,
    /// Human-readable description of the action.
    pub description: String,
    /// Display name of the acting user; empty when unknown.
    pub user_name: String,
    /// Optional free-text detail.
    pub details: Option<String>,
}
