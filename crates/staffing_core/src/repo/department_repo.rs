//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - Stores raw `area_id` / `manager_id`; never joins at write time.
//! - Does not verify that referenced areas or managers exist. The service
//!   layer does that before calling in.

use crate::model::department::{Department, DepartmentData};
use crate::model::id::RecordId;
use crate::repo::{
    ensure_tables, expect_changed, id_placeholders, parse_stored_id, RepoResult,
    MAX_IDS_PER_QUERY, NOW_EPOCH_MS_SQL,
};
use rusqlite::{params, params_from_iter, Connection, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    area_id,
    manager_id,
    created_at,
    updated_at
FROM departments";

/// Storage contract for department records.
pub trait DepartmentRepository {
    fn create_department(&self, data: &DepartmentData) -> RepoResult<RecordId>;
    fn get_department(&self, id: RecordId) -> RepoResult<Option<Department>>;

    /// Loads every listed department that exists; absent ids are skipped.
    fn get_departments(&self, ids: &[RecordId]) -> RepoResult<Vec<Department>> {
        let mut found = Vec::new();
        for &id in ids {
            if let Some(record) = self.get_department(id)? {
                found.push(record);
            }
        }
        Ok(found)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    fn update_department(&self, id: RecordId, data: &DepartmentData) -> RepoResult<()>;
    /// Hard delete; employees listing this department keep the id.
    fn delete_department(&self, id: RecordId) -> RepoResult<()>;
}

impl<R: DepartmentRepository + ?Sized> DepartmentRepository for &R {
    fn create_department(&self, data: &DepartmentData) -> RepoResult<RecordId> {
        (**self).create_department(data)
    }

    fn get_department(&self, id: RecordId) -> RepoResult<Option<Department>> {
        (**self).get_department(id)
    }

    fn get_departments(&self, ids: &[RecordId]) -> RepoResult<Vec<Department>> {
        (**self).get_departments(ids)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        (**self).list_departments()
    }

    fn update_department(&self, id: RecordId, data: &DepartmentData) -> RepoResult<()> {
        (**self).update_department(id, data)
    }

    fn delete_department(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete_department(id)
    }
}

/// SQLite-backed department repository.
#[derive(Clone, Copy)]
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["departments"])?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_department(&self, data: &DepartmentData) -> RepoResult<RecordId> {
        data.validate()?;

        let id = RecordId::generate();
        self.conn.execute(
            "INSERT INTO departments (id, name, area_id, manager_id) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                data.name.as_str(),
                data.area.to_string(),
                data.manager.to_string(),
            ],
        )?;
        Ok(id)
    }

    fn get_department(&self, id: RecordId) -> RepoResult<Option<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn get_departments(&self, ids: &[RecordId]) -> RepoResult<Vec<Department>> {
        let mut found = Vec::new();
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut stmt = self.conn.prepare(&format!(
                "{DEPARTMENT_SELECT_SQL} WHERE id IN ({}) ORDER BY id ASC;",
                id_placeholders(chunk.len())
            ))?;
            let mut rows = stmt.query(params_from_iter(chunk.iter().map(RecordId::to_string)))?;
            while let Some(row) = rows.next()? {
                found.push(parse_department_row(row)?);
            }
        }
        Ok(found)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }
        Ok(departments)
    }

    fn update_department(&self, id: RecordId, data: &DepartmentData) -> RepoResult<()> {
        data.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE departments
                 SET
                    name = ?1,
                    area_id = ?2,
                    manager_id = ?3,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?4;"
            ),
            params![
                data.name.as_str(),
                data.area.to_string(),
                data.manager.to_string(),
                id.to_string(),
            ],
        )?;
        expect_changed(changed, id)
    }

    fn delete_department(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", [id.to_string()])?;
        expect_changed(changed, id)
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    let id_text: String = row.get("id")?;
    let area_text: String = row.get("area_id")?;
    let manager_text: String = row.get("manager_id")?;

    Ok(Department {
        id: parse_stored_id(&id_text, "departments.id")?,
        name: row.get("name")?,
        area: parse_stored_id(&area_text, "departments.area_id")?,
        manager: parse_stored_id(&manager_text, "departments.manager_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
