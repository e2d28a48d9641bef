//! Manager use-case service.
//!
//! Same contract as the area service: parse ids first, merge-then-validate
//! on update, unconditional delete.

use crate::model::manager::{Manager, ManagerFields};
use crate::repo::manager_repo::ManagerRepository;
use crate::service::error::{
    parse_id, read_back, EntityKind, RepoResultExt, ServiceError, ServiceResult,
};
use log::info;

const ENTITY: EntityKind = EntityKind::Manager;

/// CRUD entry points for managers.
pub struct ManagerService<R: ManagerRepository> {
    repo: R,
}

impl<R: ManagerRepository> ManagerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_manager(&self, fields: ManagerFields) -> ServiceResult<Manager> {
        let data = fields.into_data()?;
        let id = self.repo.create_manager(&data).for_entity(ENTITY)?;
        let manager = read_back(ENTITY, id, self.repo.get_manager(id))?;
        info!("event=manager_create module=service status=ok id={id}");
        Ok(manager)
    }

    pub fn get_manager(&self, id: &str) -> ServiceResult<Manager> {
        let id = parse_id(id)?;
        match self.repo.get_manager(id).for_entity(ENTITY)? {
            Some(manager) => Ok(manager),
            None => Err(ServiceError::NotFound { entity: ENTITY, id }),
        }
    }

    pub fn list_managers(&self) -> ServiceResult<Vec<Manager>> {
        self.repo.list_managers().for_entity(ENTITY)
    }

    pub fn update_manager(&self, id: &str, fields: ManagerFields) -> ServiceResult<Manager> {
        let current = self.get_manager(id)?;
        let data = fields.merge_over(&current)?;
        self.repo
            .update_manager(current.id, &data)
            .for_entity(ENTITY)?;
        let manager = read_back(ENTITY, current.id, self.repo.get_manager(current.id))?;
        info!("event=manager_update module=service status=ok id={}", manager.id);
        Ok(manager)
    }

    pub fn delete_manager(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        self.repo.delete_manager(id).for_entity(ENTITY)?;
        info!("event=manager_delete module=service status=ok id={id}");
        Ok(())
    }
}
