//! Core staffing records: areas, managers, departments, and employees.
//! This crate is the single source of truth for referential rules between
//! them.

pub mod db;
pub mod expand;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use expand::{expand_department, expand_employee, expand_many, expand_one, ReferenceTargets};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::area::{Area, AreaFields, AreaSummary};
pub use model::department::{Department, DepartmentFields, DepartmentView};
pub use model::employee::{Employee, EmployeeFields, EmployeeView};
pub use model::id::{InvalidRecordId, RecordId};
pub use model::manager::{Manager, ManagerFields, ManagerSummary};
pub use model::reference::{Identified, MissingReference, Reference};
pub use model::validation::ValidationError;
pub use repo::area_repo::{AreaRepository, SqliteAreaRepository};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::manager_repo::{ManagerRepository, SqliteManagerRepository};
pub use repo::{RepoError, RepoResult};
pub use service::area_service::AreaService;
pub use service::department_service::DepartmentService;
pub use service::employee_service::EmployeeService;
pub use service::error::{EntityKind, ErrorDescriptor, ErrorKind, ServiceError, ServiceResult};
pub use service::manager_service::ManagerService;
pub use service::staffing::SqliteStaffing;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
