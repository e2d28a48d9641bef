//! SQLite wiring for the four services over one connection.

use crate::repo::area_repo::SqliteAreaRepository;
use crate::repo::department_repo::SqliteDepartmentRepository;
use crate::repo::employee_repo::SqliteEmployeeRepository;
use crate::repo::manager_repo::SqliteManagerRepository;
use crate::repo::RepoResult;
use crate::service::area_service::AreaService;
use crate::service::department_service::DepartmentService;
use crate::service::employee_service::EmployeeService;
use crate::service::manager_service::ManagerService;
use rusqlite::Connection;

pub type SqliteDepartmentService<'conn> = DepartmentService<
    SqliteDepartmentRepository<'conn>,
    SqliteAreaRepository<'conn>,
    SqliteManagerRepository<'conn>,
>;

pub type SqliteEmployeeService<'conn> = EmployeeService<
    SqliteEmployeeRepository<'conn>,
    SqliteDepartmentRepository<'conn>,
    SqliteAreaRepository<'conn>,
    SqliteManagerRepository<'conn>,
>;

/// All staffing services backed by one migrated connection.
pub struct SqliteStaffing<'conn> {
    pub areas: AreaService<SqliteAreaRepository<'conn>>,
    pub managers: ManagerService<SqliteManagerRepository<'conn>>,
    pub departments: SqliteDepartmentService<'conn>,
    pub employees: SqliteEmployeeService<'conn>,
}

impl<'conn> SqliteStaffing<'conn> {
    /// Builds every repository, failing if the schema is incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let areas = SqliteAreaRepository::try_new(conn)?;
        let managers = SqliteManagerRepository::try_new(conn)?;
        let departments = SqliteDepartmentRepository::try_new(conn)?;
        let employees = SqliteEmployeeRepository::try_new(conn)?;

        Ok(Self {
            areas: AreaService::new(areas),
            managers: ManagerService::new(managers),
            departments: DepartmentService::new(departments, areas, managers),
            employees: EmployeeService::new(
                employees,
                DepartmentService::new(departments, areas, managers),
            ),
        })
    }
}
