//! Employee use-case service.
//!
//! # Responsibility
//! - Enforce that every listed department exists before a write.
//! - Expand department lists on reads, two levels deep:
//!   employee -> department -> {area, manager}.
//!
//! # Invariants
//! - Department checks are all-or-nothing: one unresolved id rejects the
//!   whole write and nothing is persisted. Updates check the list only when
//!   the caller supplies one.
//! - Department order and duplicates survive writes and reads unchanged.

use crate::expand::expand_employee;
use crate::model::employee::{Employee, EmployeeData, EmployeeFields, EmployeeView};
use crate::model::id::RecordId;
use crate::model::validation::ValidationError;
use crate::repo::area_repo::AreaRepository;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::manager_repo::ManagerRepository;
use crate::service::department_service::DepartmentService;
use crate::service::error::{
    parse_id, read_back, EntityKind, RepoResultExt, ServiceError, ServiceResult,
};
use log::{debug, info, warn};
use std::collections::BTreeMap;

const ENTITY: EntityKind = EntityKind::Employee;

/// CRUD entry points for employees.
///
/// Holds a department service for existence checks and nested expansion.
pub struct EmployeeService<E, D, A, M>
where
    E: EmployeeRepository,
    D: DepartmentRepository,
    A: AreaRepository,
    M: ManagerRepository,
{
    repo: E,
    departments: DepartmentService<D, A, M>,
}

impl<E, D, A, M> EmployeeService<E, D, A, M>
where
    E: EmployeeRepository,
    D: DepartmentRepository,
    A: AreaRepository,
    M: ManagerRepository,
{
    pub fn new(repo: E, departments: DepartmentService<D, A, M>) -> Self {
        Self { repo, departments }
    }

    /// Creates an employee once every department id resolves.
    pub fn create_employee(&self, fields: EmployeeFields) -> ServiceResult<Employee> {
        let data = fields.into_data()?;
        self.check_departments(&data)?;
        let id = self.repo.create_employee(&data).for_entity(ENTITY)?;
        let employee = read_back(ENTITY, id, self.repo.get_employee(id))?;
        info!(
            "event=employee_create module=service status=ok id={id} departments={}",
            employee.departments.len()
        );
        Ok(employee)
    }

    pub fn get_employee(&self, id: &str) -> ServiceResult<EmployeeView> {
        let employee = self.load(parse_id(id)?)?;
        let targets = self.departments.views_for(&employee.departments)?;
        let view = expand_employee(&employee, &targets);
        log_dangling(&view);
        Ok(view)
    }

    pub fn list_employees(&self) -> ServiceResult<Vec<EmployeeView>> {
        let employees = self.repo.list_employees().for_entity(ENTITY)?;
        let referenced: Vec<RecordId> = employees
            .iter()
            .flat_map(|employee| employee.departments.iter().copied())
            .collect();
        let targets = self.departments.views_for(&referenced)?;

        let views: Vec<EmployeeView> = employees
            .iter()
            .map(|employee| expand_employee(employee, &targets))
            .collect();
        views.iter().for_each(log_dangling);
        Ok(views)
    }

    /// Merges supplied fields; a supplied `departments` list replaces the
    /// stored one wholesale and is re-checked. An omitted list is kept as
    /// stored, dangling entries included.
    pub fn update_employee(&self, id: &str, fields: EmployeeFields) -> ServiceResult<Employee> {
        let current = self.load(parse_id(id)?)?;
        let replaces_departments = fields.departments.is_some();
        let data = fields.merge_over(&current)?;
        if replaces_departments {
            self.check_departments(&data)?;
        }
        self.repo
            .update_employee(current.id, &data)
            .for_entity(ENTITY)?;
        let employee = read_back(ENTITY, current.id, self.repo.get_employee(current.id))?;
        info!(
            "event=employee_update module=service status=ok id={} departments={}",
            employee.id,
            employee.departments.len()
        );
        Ok(employee)
    }

    pub fn delete_employee(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        self.repo.delete_employee(id).for_entity(ENTITY)?;
        info!("event=employee_delete module=service status=ok id={id}");
        Ok(())
    }

    fn load(&self, id: RecordId) -> ServiceResult<Employee> {
        self.repo
            .get_employee(id)
            .for_entity(ENTITY)?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    /// Rejects on the first position whose department does not exist.
    ///
    /// Repeated ids are looked up once.
    fn check_departments(&self, data: &EmployeeData) -> ServiceResult<()> {
        let mut known: BTreeMap<RecordId, bool> = BTreeMap::new();
        for (position, id) in data.departments.iter().copied().enumerate() {
            let exists = match known.get(&id) {
                Some(exists) => *exists,
                None => {
                    let exists = self.departments.department_exists(id)?;
                    known.insert(id, exists);
                    exists
                }
            };

            if !exists {
                warn!(
                    "event=employee_reference module=service status=error field=departments position={position} id={id}"
                );
                return Err(ServiceError::Validation(
                    ValidationError::UnresolvedReference {
                        field: "departments",
                        position: Some(position),
                        id,
                    },
                ));
            }
        }
        Ok(())
    }
}

fn log_dangling(view: &EmployeeView) {
    let missing = view
        .departments
        .iter()
        .filter(|department| department.is_missing())
        .count();
    if missing > 0 {
        debug!(
            "event=employee_expand module=service status=ok id={} missing_departments={missing}",
            view.id
        );
    }
}
