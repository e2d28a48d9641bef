//! Read-time reference expansion.
//!
//! # Responsibility
//! - Replace reference ids with projections of already-fetched targets.
//!
//! # Invariants
//! - Pure: no storage access, no logging, inputs are never mutated.
//! - Best-effort: an id with no target becomes `Reference::Missing`, never
//!   an error, so one dangling id cannot fail the surrounding read.
//! - Deterministic for identical inputs; sequence order and duplicates are
//!   preserved.

use crate::model::area::{Area, AreaSummary};
use crate::model::department::{Department, DepartmentView};
use crate::model::employee::{Employee, EmployeeView};
use crate::model::id::RecordId;
use crate::model::manager::{Manager, ManagerSummary};
use crate::model::reference::{Identified, Reference};
use std::collections::BTreeMap;

/// Snapshot of target records keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTargets<T> {
    records: BTreeMap<RecordId, T>,
}

impl<T> Default for ReferenceTargets<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: Identified> ReferenceTargets<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: T) {
        self.records.insert(record.id(), record);
    }
}

impl<T> ReferenceTargets<T> {
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.get(&id)
    }
}

impl<T: Identified> FromIterator<T> for ReferenceTargets<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut targets = Self::new();
        for record in iter {
            targets.insert(record);
        }
        targets
    }
}

/// Resolves one reference through `project`, or marks it missing.
pub fn expand_one<T, P>(
    id: RecordId,
    targets: &ReferenceTargets<T>,
    project: impl Fn(&T) -> P,
) -> Reference<P> {
    match targets.get(id) {
        Some(target) => Reference::Resolved(project(target)),
        None => Reference::missing(id),
    }
}

/// Resolves an ordered reference list element by element.
pub fn expand_many<T, P>(
    ids: &[RecordId],
    targets: &ReferenceTargets<T>,
    project: impl Fn(&T) -> P,
) -> Vec<Reference<P>> {
    ids.iter()
        .map(|id| expand_one(*id, targets, &project))
        .collect()
}

/// Department join: area -> `{id, name, building}`, manager ->
/// `{id, education, shift}`.
pub fn expand_department(
    department: &Department,
    areas: &ReferenceTargets<Area>,
    managers: &ReferenceTargets<Manager>,
) -> DepartmentView {
    DepartmentView {
        id: department.id,
        name: department.name.clone(),
        area: expand_one(department.area, areas, |area| AreaSummary::from(area)),
        manager: expand_one(department.manager, managers, |manager| {
            ManagerSummary::from(manager)
        }),
        created_at: department.created_at,
        updated_at: department.updated_at,
    }
}

/// Employee join: each department id -> the full (already expanded)
/// department view.
pub fn expand_employee(
    employee: &Employee,
    departments: &ReferenceTargets<DepartmentView>,
) -> EmployeeView {
    EmployeeView {
        id: employee.id,
        name: employee.name.clone(),
        surname: employee.surname.clone(),
        age: employee.age,
        gender: employee.gender.clone(),
        departments: expand_many(&employee.departments, departments, DepartmentView::clone),
        created_at: employee.created_at,
        updated_at: employee.updated_at,
    }
}
