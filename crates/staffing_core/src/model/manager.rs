//! Manager records.

use crate::model::id::RecordId;
use crate::model::reference::Identified;
use crate::model::validation::{check_text, require, ValidationResult};
use serde::{Deserialize, Serialize};

/// Persisted manager record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub id: RecordId,
    pub name: String,
    pub education: String,
    pub shift: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerData {
    pub name: String,
    pub education: String,
    pub shift: String,
}

/// Caller payload for manager create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerFields {
    pub name: Option<String>,
    pub education: Option<String>,
    pub shift: Option<String>,
}

/// Projection embedded into expanded departments. Leaves out `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSummary {
    pub id: RecordId,
    pub education: String,
    pub shift: String,
}

impl ManagerData {
    pub fn validate(&self) -> ValidationResult<()> {
        check_text("name", &self.name)?;
        check_text("education", &self.education)?;
        check_text("shift", &self.shift)
    }
}

impl ManagerFields {
    pub fn into_data(self) -> ValidationResult<ManagerData> {
        let data = ManagerData {
            name: require("name", self.name)?,
            education: require("education", self.education)?,
            shift: require("shift", self.shift)?,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn merge_over(self, current: &Manager) -> ValidationResult<ManagerData> {
        let data = ManagerData {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            education: self.education.unwrap_or_else(|| current.education.clone()),
            shift: self.shift.unwrap_or_else(|| current.shift.clone()),
        };
        data.validate()?;
        Ok(data)
    }
}

impl Identified for Manager {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for ManagerSummary {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl From<&Manager> for ManagerSummary {
    fn from(manager: &Manager) -> Self {
        Self {
            id: manager.id,
            education: manager.education.clone(),
            shift: manager.shift.clone(),
        }
    }
}
