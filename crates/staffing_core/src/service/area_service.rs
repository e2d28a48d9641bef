//! Area use-case service.
//!
//! # Invariants
//! - Ids are parsed before any repository call.
//! - Updates are shallow merges followed by full re-validation.
//! - Delete never looks at departments; dangling area ids are allowed.

use crate::model::area::{Area, AreaFields};
use crate::repo::area_repo::AreaRepository;
use crate::service::error::{
    parse_id, read_back, EntityKind, RepoResultExt, ServiceError, ServiceResult,
};
use log::info;

const ENTITY: EntityKind = EntityKind::Area;

/// CRUD entry points for areas.
pub struct AreaService<R: AreaRepository> {
    repo: R,
}

impl<R: AreaRepository> AreaService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new area, returning the stored record.
    pub fn create_area(&self, fields: AreaFields) -> ServiceResult<Area> {
        let data = fields.into_data()?;
        let id = self.repo.create_area(&data).for_entity(ENTITY)?;
        let area = read_back(ENTITY, id, self.repo.get_area(id))?;
        info!("event=area_create module=service status=ok id={id}");
        Ok(area)
    }

    pub fn get_area(&self, id: &str) -> ServiceResult<Area> {
        let id = parse_id(id)?;
        self.repo
            .get_area(id)
            .for_entity(ENTITY)?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    pub fn list_areas(&self) -> ServiceResult<Vec<Area>> {
        self.repo.list_areas().for_entity(ENTITY)
    }

    /// Merges supplied fields over the stored area.
    pub fn update_area(&self, id: &str, fields: AreaFields) -> ServiceResult<Area> {
        let current = self.get_area(id)?;
        let data = fields.merge_over(&current)?;
        self.repo.update_area(current.id, &data).for_entity(ENTITY)?;
        let area = read_back(ENTITY, current.id, self.repo.get_area(current.id))?;
        info!("event=area_update module=service status=ok id={}", area.id);
        Ok(area)
    }

    pub fn delete_area(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        self.repo.delete_area(id).for_entity(ENTITY)?;
        info!("event=area_delete module=service status=ok id={id}");
        Ok(())
    }
}
