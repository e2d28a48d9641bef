//! Record identifiers.
//!
//! # Invariants
//! - Ids are UUIDv7 values, so lexical order of the hyphenated text form
//!   follows creation order.
//! - Ids are assigned by repositories at insert time and never change.
//! - Parsing never touches storage; malformed input is rejected up front.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, creation-sortable identifier shared by all four entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses caller-supplied id text.
    ///
    /// Accepts any well-formed UUID spelling; the nil UUID is rejected since
    /// no repository ever assigns it.
    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        match Uuid::parse_str(value) {
            Ok(uuid) if !uuid.is_nil() => Ok(Self(uuid)),
            _ => Err(InvalidRecordId {
                value: value.to_string(),
            }),
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Id text that is not a well-formed record identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordId {
    pub value: String,
}

impl Display for InvalidRecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed record id `{}`", self.value)
    }
}

impl Error for InvalidRecordId {}

#[cfg(test)]
mod tests {
    use super::RecordId;

    #[test]
    fn generated_ids_sort_by_creation() {
        let first = RecordId::generate();
        let second = RecordId::generate();
        assert!(first < second);
        assert!(first.to_string() < second.to_string());
    }

    #[test]
    fn parse_round_trips_display_form() {
        let id = RecordId::generate();
        assert_eq!(RecordId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_normalizes_uppercase_text() {
        let id = RecordId::generate();
        let upper = id.to_string().to_uppercase();
        assert_eq!(RecordId::parse(&upper).unwrap().to_string(), id.to_string());
    }

    #[test]
    fn parse_rejects_malformed_and_nil_values() {
        for value in [
            "",
            "660c8e5b9f8a95e8fddbfcc1",
            "not-an-id",
            "00000000-0000-0000-0000-000000000000",
        ] {
            let err = RecordId::parse(value).unwrap_err();
            assert_eq!(err.value, value);
        }
    }
}
