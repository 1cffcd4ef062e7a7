//! Composite key encoding for entity and trash tables.
//!
//! Keys are `{kind_tag:1}{seq:8BE}`: one stable byte per entity kind
//! followed by the big-endian sequence number, so a range scan groups by
//! kind and iterates in allocation order within a kind.

use patrimonio_types::{EntityId, EntityKind};

/// Encoded key width: tag byte plus big-endian u64.
pub const KEY_LEN: usize = 9;

/// Encodes an entity id into its composite table key.
#[must_use]
pub fn encode_entity_key(id: EntityId) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    key[0] = id.kind().tag();
    key[1..].copy_from_slice(&id.seq().to_be_bytes());
    key
}

/// Decodes a composite table key back into an entity id.
///
/// Returns `None` for keys of the wrong width or with an unknown kind tag.
#[must_use]
pub fn decode_entity_key(key: &[u8]) -> Option<EntityId> {
    if key.len() != KEY_LEN {
        return None;
    }
    let kind = EntityKind::from_tag(key[0])?;
    let seq = u64::from_be_bytes(key[1..].try_into().ok()?);
    Some(EntityId::new(kind, seq))
}

/// Returns the inclusive lower bound key for a kind's range.
#[must_use]
pub fn kind_range_start(kind: EntityKind) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    key[0] = kind.tag();
    key
}
