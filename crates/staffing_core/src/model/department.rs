//! Department records.
//!
//! # Invariants
//! - A department references exactly one area and exactly one manager.
//! - Both references must resolve at write time; this module only checks
//!   their shape, existence is checked by the department service.
//! - The stored record keeps raw ids; `DepartmentView` is the read-time join.

use crate::model::area::AreaSummary;
use crate::model::id::RecordId;
use crate::model::manager::ManagerSummary;
use crate::model::reference::{Identified, Reference};
use crate::model::validation::{check_text, parse_reference, require, ValidationResult};
use serde::{Deserialize, Serialize};

/// Persisted department record with raw reference ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: RecordId,
    pub name: String,
    pub area: RecordId,
    pub manager: RecordId,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentData {
    pub name: String,
    pub area: RecordId,
    pub manager: RecordId,
}

/// Caller payload for department create/update.
///
/// References arrive as id text and are parsed during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFields {
    pub name: Option<String>,
    pub area: Option<String>,
    pub manager: Option<String>,
}

/// Department as returned by reads, with references expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentView {
    pub id: RecordId,
    pub name: String,
    pub area: Reference<AreaSummary>,
    pub manager: Reference<ManagerSummary>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DepartmentData {
    pub fn validate(&self) -> ValidationResult<()> {
        check_text("name", &self.name)
    }
}

impl DepartmentFields {
    pub fn into_data(self) -> ValidationResult<DepartmentData> {
        let name = require("name", self.name)?;
        let area = require("area", self.area)?;
        let manager = require("manager", self.manager)?;
        let data = DepartmentData {
            name,
            area: parse_reference("area", None, &area)?,
            manager: parse_reference("manager", None, &manager)?,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn merge_over(self, current: &Department) -> ValidationResult<DepartmentData> {
        let area = match self.area {
            Some(value) => parse_reference("area", None, &value)?,
            None => current.area,
        };
        let manager = match self.manager {
            Some(value) => parse_reference("manager", None, &value)?,
            None => current.manager,
        };
        let data = DepartmentData {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            area,
            manager,
        };
        data.validate()?;
        Ok(data)
    }
}

impl Identified for Department {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for DepartmentView {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::DepartmentFields;
    use crate::model::id::RecordId;
    use crate::model::validation::ValidationError;

    fn fields(area: &str, manager: &str) -> DepartmentFields {
        DepartmentFields {
            name: Some("Accounting".to_string()),
            area: Some(area.to_string()),
            manager: Some(manager.to_string()),
        }
    }

    #[test]
    fn missing_name_is_rejected_before_references() {
        let mut input = fields("bad", "bad");
        input.name = None;
        assert_eq!(
            input.into_data().unwrap_err(),
            ValidationError::MissingField("name")
        );
    }

    #[test]
    fn malformed_area_reference_names_the_field() {
        let manager = RecordId::generate().to_string();
        let err = fields("660c8e5b9f8a95e8fddbfcc1", &manager)
            .into_data()
            .unwrap_err();
        assert_eq!(err.field(), "area");
    }

    #[test]
    fn unknown_payload_keys_are_ignored() {
        let area = RecordId::generate();
        let manager = RecordId::generate();
        let json = format!(
            r#"{{"name":"Accounting","area":"{area}","manager":"{manager}","budget":12}}"#
        );
        let input: DepartmentFields = serde_json::from_str(&json).unwrap();
        let data = input.into_data().unwrap();
        assert_eq!(data.area, area);
        assert_eq!(data.manager, manager);
    }
}
