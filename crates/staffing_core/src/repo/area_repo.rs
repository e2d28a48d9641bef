//! Area repository contract and SQLite implementation.

use crate::model::area::{Area, AreaData};
use crate::model::id::RecordId;
use crate::repo::{
    ensure_tables, expect_changed, id_placeholders, parse_stored_id, RepoResult,
    MAX_IDS_PER_QUERY, NOW_EPOCH_MS_SQL,
};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const AREA_SELECT_SQL: &str = "SELECT id, name, building, created_at, updated_at FROM areas";

/// Storage contract for area records.
pub trait AreaRepository {
    /// Inserts a new area under a freshly generated id.
    fn create_area(&self, data: &AreaData) -> RepoResult<RecordId>;
    fn get_area(&self, id: RecordId) -> RepoResult<Option<Area>>;

    /// Loads every listed area that exists; absent ids are skipped.
    fn get_areas(&self, ids: &[RecordId]) -> RepoResult<Vec<Area>> {
        let mut found = Vec::new();
        for &id in ids {
            if let Some(record) = self.get_area(id)? {
                found.push(record);
            }
        }
        Ok(found)
    }

    /// All areas in creation order.
    fn list_areas(&self) -> RepoResult<Vec<Area>>;
    /// Replaces stored content and refreshes `updated_at`.
    fn update_area(&self, id: RecordId, data: &AreaData) -> RepoResult<()>;
    /// Hard delete. Departments pointing here are left untouched.
    fn delete_area(&self, id: RecordId) -> RepoResult<()>;
}

impl<R: AreaRepository + ?Sized> AreaRepository for &R {
    fn create_area(&self, data: &AreaData) -> RepoResult<RecordId> {
        (**self).create_area(data)
    }

    fn get_area(&self, id: RecordId) -> RepoResult<Option<Area>> {
        (**self).get_area(id)
    }

    fn get_areas(&self, ids: &[RecordId]) -> RepoResult<Vec<Area>> {
        (**self).get_areas(ids)
    }

    fn list_areas(&self) -> RepoResult<Vec<Area>> {
        (**self).list_areas()
    }

    fn update_area(&self, id: RecordId, data: &AreaData) -> RepoResult<()> {
        (**self).update_area(id, data)
    }

    fn delete_area(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete_area(id)
    }
}

/// SQLite-backed area repository.
#[derive(Clone, Copy)]
pub struct SqliteAreaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAreaRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["areas"])?;
        Ok(Self { conn })
    }
}

impl AreaRepository for SqliteAreaRepository<'_> {
    fn create_area(&self, data: &AreaData) -> RepoResult<RecordId> {
        data.validate()?;

        let id = RecordId::generate();
        self.conn.execute(
            "INSERT INTO areas (id, name, building) VALUES (?1, ?2, ?3);",
            params![id.to_string(), data.name.as_str(), data.building.as_str()],
        )?;
        Ok(id)
    }

    fn get_area(&self, id: RecordId) -> RepoResult<Option<Area>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AREA_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt
            .query_row([id.to_string()], RawArea::from_row)
            .optional()?;
        raw.map(RawArea::into_area).transpose()
    }

    fn get_areas(&self, ids: &[RecordId]) -> RepoResult<Vec<Area>> {
        let mut found = Vec::new();
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut stmt = self.conn.prepare(&format!(
                "{AREA_SELECT_SQL} WHERE id IN ({}) ORDER BY id ASC;",
                id_placeholders(chunk.len())
            ))?;
            let mut rows = stmt.query(params_from_iter(chunk.iter().map(RecordId::to_string)))?;
            while let Some(row) = rows.next()? {
                found.push(RawArea::from_row(row)?.into_area()?);
            }
        }
        Ok(found)
    }

    fn list_areas(&self) -> RepoResult<Vec<Area>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AREA_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut areas = Vec::new();
        while let Some(row) = rows.next()? {
            areas.push(RawArea::from_row(row)?.into_area()?);
        }
        Ok(areas)
    }

    fn update_area(&self, id: RecordId, data: &AreaData) -> RepoResult<()> {
        data.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE areas
                 SET
                    name = ?1,
                    building = ?2,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?3;"
            ),
            params![data.name.as_str(), data.building.as_str(), id.to_string()],
        )?;
        expect_changed(changed, id)
    }

    fn delete_area(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM areas WHERE id = ?1;", [id.to_string()])?;
        expect_changed(changed, id)
    }
}

struct RawArea {
    id: String,
    name: String,
    building: String,
    created_at: i64,
    updated_at: i64,
}

impl RawArea {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            building: row.get("building")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn into_area(self) -> RepoResult<Area> {
        Ok(Area {
            id: parse_stored_id(&self.id, "areas.id")?,
            name: self.name,
            building: self.building,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
