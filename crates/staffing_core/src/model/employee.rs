//! Employee records.
//!
//! # Invariants
//! - `age` is never negative.
//! - `departments` keeps caller order and duplicates; it may be empty but
//!   must be supplied on create.
//! - Every department id must resolve at write time (checked by the
//!   employee service, all-or-nothing).

use crate::model::department::DepartmentView;
use crate::model::id::RecordId;
use crate::model::reference::{Identified, Reference};
use crate::model::validation::{
    check_non_negative, check_text, parse_references, require, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Persisted employee record with raw department ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub surname: String,
    pub age: i64,
    pub gender: String,
    pub departments: Vec<RecordId>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeData {
    pub name: String,
    pub surname: String,
    pub age: i64,
    pub gender: String,
    pub departments: Vec<RecordId>,
}

/// Caller payload for employee create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub departments: Option<Vec<String>>,
}

/// Employee as returned by reads; each department is fully expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: RecordId,
    pub name: String,
    pub surname: String,
    pub age: i64,
    pub gender: String,
    pub departments: Vec<Reference<DepartmentView>>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EmployeeData {
    pub fn validate(&self) -> ValidationResult<()> {
        check_text("name", &self.name)?;
        check_text("surname", &self.surname)?;
        check_non_negative("age", self.age)?;
        check_text("gender", &self.gender)
    }
}

impl EmployeeFields {
    pub fn into_data(self) -> ValidationResult<EmployeeData> {
        let name = require("name", self.name)?;
        let surname = require("surname", self.surname)?;
        let age = require("age", self.age)?;
        let gender = require("gender", self.gender)?;
        let departments = require("departments", self.departments)?;
        let data = EmployeeData {
            name,
            surname,
            age,
            gender,
            departments: parse_references("departments", &departments)?,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn merge_over(self, current: &Employee) -> ValidationResult<EmployeeData> {
        let departments = match self.departments {
            Some(values) => parse_references("departments", &values)?,
            None => current.departments.clone(),
        };
        let data = EmployeeData {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            surname: self.surname.unwrap_or_else(|| current.surname.clone()),
            age: self.age.unwrap_or(current.age),
            gender: self.gender.unwrap_or_else(|| current.gender.clone()),
            departments,
        };
        data.validate()?;
        Ok(data)
    }
}

impl Identified for Employee {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeeFields};
    use crate::model::id::RecordId;
    use crate::model::validation::ValidationError;

    fn stored() -> Employee {
        Employee {
            id: RecordId::generate(),
            name: "Ana".to_string(),
            surname: "Ruiz".to_string(),
            age: 31,
            gender: "female".to_string(),
            departments: vec![RecordId::generate()],
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[test]
    fn departments_must_be_supplied_on_create() {
        let input = EmployeeFields {
            name: Some("Ana".to_string()),
            surname: Some("Ruiz".to_string()),
            age: Some(31),
            gender: Some("female".to_string()),
            departments: None,
        };
        assert_eq!(
            input.into_data().unwrap_err(),
            ValidationError::MissingField("departments")
        );
    }

    #[test]
    fn negative_age_is_rejected() {
        let input = EmployeeFields {
            age: Some(-1),
            ..EmployeeFields::default()
        };
        assert_eq!(
            input.merge_over(&stored()).unwrap_err(),
            ValidationError::NegativeValue {
                field: "age",
                value: -1
            }
        );
    }

    #[test]
    fn merge_keeps_unsupplied_fields() {
        let current = stored();
        let input = EmployeeFields {
            name: Some("New Name".to_string()),
            ..EmployeeFields::default()
        };
        let merged = input.merge_over(&current).unwrap();
        assert_eq!(merged.name, "New Name");
        assert_eq!(merged.surname, current.surname);
        assert_eq!(merged.age, current.age);
        assert_eq!(merged.departments, current.departments);
    }
}
