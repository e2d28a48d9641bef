//! Manager repository contract and SQLite implementation.

use crate::model::id::RecordId;
use crate::model::manager::{Manager, ManagerData};
use crate::repo::{
    ensure_tables, expect_changed, id_placeholders, parse_stored_id, RepoResult,
    MAX_IDS_PER_QUERY, NOW_EPOCH_MS_SQL,
};
use rusqlite::{params, params_from_iter, Connection, Row};

const MANAGER_SELECT_SQL: &str = "SELECT
    id,
    name,
    education,
    shift,
    created_at,
    updated_at
FROM managers";

/// Storage contract for manager records.
pub trait ManagerRepository {
    fn create_manager(&self, data: &ManagerData) -> RepoResult<RecordId>;
    fn get_manager(&self, id: RecordId) -> RepoResult<Option<Manager>>;

    /// Loads every listed manager that exists; absent ids are skipped.
    fn get_managers(&self, ids: &[RecordId]) -> RepoResult<Vec<Manager>> {
        let mut found = Vec::new();
        for &id in ids {
            if let Some(record) = self.get_manager(id)? {
                found.push(record);
            }
        }
        Ok(found)
    }

    fn list_managers(&self) -> RepoResult<Vec<Manager>>;
    fn update_manager(&self, id: RecordId, data: &ManagerData) -> RepoResult<()>;
    /// Hard delete; never touches departments led by this manager.
    fn delete_manager(&self, id: RecordId) -> RepoResult<()>;
}

impl<R: ManagerRepository + ?Sized> ManagerRepository for &R {
    fn create_manager(&self, data: &ManagerData) -> RepoResult<RecordId> {
        (**self).create_manager(data)
    }

    fn get_manager(&self, id: RecordId) -> RepoResult<Option<Manager>> {
        (**self).get_manager(id)
    }

    fn get_managers(&self, ids: &[RecordId]) -> RepoResult<Vec<Manager>> {
        (**self).get_managers(ids)
    }

    fn list_managers(&self) -> RepoResult<Vec<Manager>> {
        (**self).list_managers()
    }

    fn update_manager(&self, id: RecordId, data: &ManagerData) -> RepoResult<()> {
        (**self).update_manager(id, data)
    }

    fn delete_manager(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete_manager(id)
    }
}

/// SQLite-backed manager repository.
#[derive(Clone, Copy)]
pub struct SqliteManagerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteManagerRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["managers"])?;
        Ok(Self { conn })
    }
}

impl ManagerRepository for SqliteManagerRepository<'_> {
    fn create_manager(&self, data: &ManagerData) -> RepoResult<RecordId> {
        data.validate()?;

        let id = RecordId::generate();
        self.conn.execute(
            "INSERT INTO managers (id, name, education, shift) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                data.name.as_str(),
                data.education.as_str(),
                data.shift.as_str(),
            ],
        )?;
        Ok(id)
    }

    fn get_manager(&self, id: RecordId) -> RepoResult<Option<Manager>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MANAGER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_manager_row(row)?));
        }
        Ok(None)
    }

    fn get_managers(&self, ids: &[RecordId]) -> RepoResult<Vec<Manager>> {
        let mut found = Vec::new();
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut stmt = self.conn.prepare(&format!(
                "{MANAGER_SELECT_SQL} WHERE id IN ({}) ORDER BY id ASC;",
                id_placeholders(chunk.len())
            ))?;
            let mut rows = stmt.query(params_from_iter(chunk.iter().map(RecordId::to_string)))?;
            while let Some(row) = rows.next()? {
                found.push(parse_manager_row(row)?);
            }
        }
        Ok(found)
    }

    fn list_managers(&self) -> RepoResult<Vec<Manager>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MANAGER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut managers = Vec::new();
        while let Some(row) = rows.next()? {
            managers.push(parse_manager_row(row)?);
        }
        Ok(managers)
    }

    fn update_manager(&self, id: RecordId, data: &ManagerData) -> RepoResult<()> {
        data.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE managers
                 SET
                    name = ?1,
                    education = ?2,
                    shift = ?3,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?4;"
            ),
            params![
                data.name.as_str(),
                data.education.as_str(),
                data.shift.as_str(),
                id.to_string(),
            ],
        )?;
        expect_changed(changed, id)
    }

    fn delete_manager(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM managers WHERE id = ?1;", [id.to_string()])?;
        expect_changed(changed, id)
    }
}

fn parse_manager_row(row: &Row<'_>) -> RepoResult<Manager> {
    let id_text: String = row.get("id")?;
    Ok(Manager {
        id: parse_stored_id(&id_text, "managers.id")?,
        name: row.get("name")?,
        education: row.get("education")?,
        shift: row.get("shift")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
