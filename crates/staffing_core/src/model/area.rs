//! Area (building) records.

use crate::model::id::RecordId;
use crate::model::reference::Identified;
use crate::model::validation::{check_text, require, ValidationResult};
use serde::{Deserialize, Serialize};

/// Persisted area record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: RecordId,
    pub name: String,
    pub building: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds; refreshed on every update.
    pub updated_at: i64,
}

/// Validated area content, as written by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaData {
    pub name: String,
    pub building: String,
}

/// Caller payload for area create/update. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaFields {
    pub name: Option<String>,
    pub building: Option<String>,
}

/// Projection embedded into expanded departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub id: RecordId,
    pub name: String,
    pub building: String,
}

impl AreaData {
    pub fn validate(&self) -> ValidationResult<()> {
        check_text("name", &self.name)?;
        check_text("building", &self.building)
    }
}

impl AreaFields {
    /// Builds content for a new area; every field is required.
    pub fn into_data(self) -> ValidationResult<AreaData> {
        let data = AreaData {
            name: require("name", self.name)?,
            building: require("building", self.building)?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Shallow-merges supplied fields over `current`.
    pub fn merge_over(self, current: &Area) -> ValidationResult<AreaData> {
        let data = AreaData {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            building: self.building.unwrap_or_else(|| current.building.clone()),
        };
        data.validate()?;
        Ok(data)
    }
}

impl Identified for Area {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for AreaSummary {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl From<&Area> for AreaSummary {
    fn from(area: &Area) -> Self {
        Self {
            id: area.id,
            name: area.name.clone(),
            building: area.building.clone(),
        }
    }
}
