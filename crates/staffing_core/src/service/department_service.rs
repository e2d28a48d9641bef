//! Department use-case service.
//!
//! # Responsibility
//! - Check that `area` and `manager` resolve before every write.
//! - Join departments with their area and manager on every read.
//!
//! # Invariants
//! - Write path is validate-then-write: field checks, then area lookup,
//!   then manager lookup, then the repository call. Updates look up only the
//!   references the caller supplied.
//! - The lookups and the write are separate statements, so a concurrent
//!   delete can still slip between.
//! - Read path is fetch-then-project: targets are loaded once per distinct
//!   id, then handed to the pure expander.
//! - Delete never looks at employees.

use crate::expand::{expand_department, ReferenceTargets};
use crate::model::area::Area;
use crate::model::department::{Department, DepartmentData, DepartmentFields, DepartmentView};
use crate::model::id::RecordId;
use crate::model::manager::Manager;
use crate::model::validation::ValidationError;
use crate::repo::area_repo::AreaRepository;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::manager_repo::ManagerRepository;
use crate::service::error::{
    parse_id, read_back, EntityKind, RepoResultExt, ServiceError, ServiceResult,
};
use log::{debug, info, warn};
use std::collections::BTreeSet;

const ENTITY: EntityKind = EntityKind::Department;

/// CRUD entry points for departments, wired to the area and manager stores
/// they reference.
pub struct DepartmentService<D, A, M>
where
    D: DepartmentRepository,
    A: AreaRepository,
    M: ManagerRepository,
{
    repo: D,
    areas: A,
    managers: M,
}

impl<D, A, M> DepartmentService<D, A, M>
where
    D: DepartmentRepository,
    A: AreaRepository,
    M: ManagerRepository,
{
    pub fn new(repo: D, areas: A, managers: M) -> Self {
        Self {
            repo,
            areas,
            managers,
        }
    }

    /// Creates a department after both references resolve.
    ///
    /// Returns the stored record with raw reference ids.
    pub fn create_department(&self, fields: DepartmentFields) -> ServiceResult<Department> {
        let data = fields.into_data()?;
        self.check_references(&data)?;
        let id = self.repo.create_department(&data).for_entity(ENTITY)?;
        let department = read_back(ENTITY, id, self.repo.get_department(id))?;
        info!(
            "event=department_create module=service status=ok id={id} area={} manager={}",
            department.area, department.manager
        );
        Ok(department)
    }

    /// Loads one department with area and manager expanded.
    pub fn get_department(&self, id: &str) -> ServiceResult<DepartmentView> {
        let department = self.load(parse_id(id)?)?;
        let (areas, managers) = self.targets_for(std::slice::from_ref(&department))?;
        let view = expand_department(&department, &areas, &managers);
        log_dangling(&view);
        Ok(view)
    }

    /// Lists all departments in creation order, expanded.
    pub fn list_departments(&self) -> ServiceResult<Vec<DepartmentView>> {
        let departments = self.repo.list_departments().for_entity(ENTITY)?;
        self.expand(departments)
    }

    /// Merges supplied fields and re-validates the merged record.
    ///
    /// Only references present in `fields` are checked; a stored reference
    /// whose target is gone stays as it is.
    pub fn update_department(
        &self,
        id: &str,
        fields: DepartmentFields,
    ) -> ServiceResult<Department> {
        let current = self.load(parse_id(id)?)?;
        let check_area = fields.area.is_some();
        let check_manager = fields.manager.is_some();
        let data = fields.merge_over(&current)?;
        if check_area {
            self.check_area(data.area)?;
        }
        if check_manager {
            self.check_manager(data.manager)?;
        }
        self.repo
            .update_department(current.id, &data)
            .for_entity(ENTITY)?;
        let department = read_back(ENTITY, current.id, self.repo.get_department(current.id))?;
        info!(
            "event=department_update module=service status=ok id={}",
            department.id
        );
        Ok(department)
    }

    pub fn delete_department(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        self.repo.delete_department(id).for_entity(ENTITY)?;
        info!("event=department_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Whether a department with `id` currently exists.
    pub(crate) fn department_exists(&self, id: RecordId) -> ServiceResult<bool> {
        Ok(self.repo.get_department(id).for_entity(ENTITY)?.is_some())
    }

    /// Expanded views for every distinct id in `ids` that still exists.
    ///
    /// Absent ids are simply left out; callers turn them into missing
    /// markers.
    pub(crate) fn views_for(
        &self,
        ids: &[RecordId],
    ) -> ServiceResult<ReferenceTargets<DepartmentView>> {
        let departments = self
            .repo
            .get_departments(&distinct(ids.iter().copied()))
            .for_entity(ENTITY)?;
        Ok(self.expand(departments)?.into_iter().collect())
    }

    fn load(&self, id: RecordId) -> ServiceResult<Department> {
        self.repo
            .get_department(id)
            .for_entity(ENTITY)?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    fn check_references(&self, data: &DepartmentData) -> ServiceResult<()> {
        self.check_area(data.area)?;
        self.check_manager(data.manager)
    }

    fn check_area(&self, id: RecordId) -> ServiceResult<()> {
        if self.areas.get_area(id).for_entity(EntityKind::Area)?.is_none() {
            warn!("event=department_reference module=service status=error field=area id={id}");
            return Err(unresolved("area", id));
        }
        Ok(())
    }

    fn check_manager(&self, id: RecordId) -> ServiceResult<()> {
        if self
            .managers
            .get_manager(id)
            .for_entity(EntityKind::Manager)?
            .is_none()
        {
            warn!("event=department_reference module=service status=error field=manager id={id}");
            return Err(unresolved("manager", id));
        }
        Ok(())
    }

    fn expand(&self, departments: Vec<Department>) -> ServiceResult<Vec<DepartmentView>> {
        let (areas, managers) = self.targets_for(&departments)?;
        let views: Vec<DepartmentView> = departments
            .iter()
            .map(|department| expand_department(department, &areas, &managers))
            .collect();
        views.iter().for_each(log_dangling);
        Ok(views)
    }

    /// Loads each distinct area and manager referenced by `departments`,
    /// one batch per store.
    fn targets_for(
        &self,
        departments: &[Department],
    ) -> ServiceResult<(ReferenceTargets<Area>, ReferenceTargets<Manager>)> {
        let areas = self
            .areas
            .get_areas(&distinct(departments.iter().map(|d| d.area)))
            .for_entity(EntityKind::Area)?;
        let managers = self
            .managers
            .get_managers(&distinct(departments.iter().map(|d| d.manager)))
            .for_entity(EntityKind::Manager)?;

        Ok((areas.into_iter().collect(), managers.into_iter().collect()))
    }
}

fn log_dangling(view: &DepartmentView) {
    if view.area.is_missing() || view.manager.is_missing() {
        debug!(
            "event=department_expand module=service status=ok id={} area_missing={} manager_missing={}",
            view.id,
            view.area.is_missing(),
            view.manager.is_missing()
        );
    }
}

/// Sorted ids with repeats removed.
fn distinct(ids: impl Iterator<Item = RecordId>) -> Vec<RecordId> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

fn unresolved(field: &'static str, id: RecordId) -> ServiceError {
    ServiceError::Validation(ValidationError::UnresolvedReference {
        field,
        position: None,
        id,
    })
}
