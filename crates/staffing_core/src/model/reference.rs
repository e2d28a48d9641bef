//! Read-side representation of a reference field.
//!
//! A reference is either resolved to a projection of its target record or
//! marked missing when the target no longer exists. Missing is a normal
//! state, not an error: deletes never cascade.

use crate::model::id::RecordId;
use serde::{Deserialize, Serialize};

/// Records that carry their own stable id.
pub trait Identified {
    fn id(&self) -> RecordId;
}

/// Expanded reference field.
///
/// Serialized untagged: a resolved reference is the projection object
/// itself, a missing one is `{"id": "...", "missing": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Resolved(T),
    Missing(MissingReference),
}

/// Marker left in place of a dangling reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReference {
    pub id: RecordId,
    pub missing: bool,
}

impl<T> Reference<T> {
    pub fn missing(id: RecordId) -> Self {
        Self::Missing(MissingReference { id, missing: true })
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

impl<T: Identified> Reference<T> {
    /// Id of the referenced record, whether or not it resolved.
    pub fn target_id(&self) -> RecordId {
        match self {
            Self::Resolved(value) => value.id(),
            Self::Missing(marker) => marker.id,
        }
    }
}
