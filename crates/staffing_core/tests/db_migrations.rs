use rusqlite::Connection;
use staffing_core::db::migrations::latest_version;
use staffing_core::db::{open_db, open_db_in_memory, DbError};
use staffing_core::{AreaFields, RepoError, SqliteAreaRepository, SqliteStaffing};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "areas",
        "managers",
        "departments",
        "employees",
        "employee_departments",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffing.sqlite3");

    let area_id = {
        let conn = open_db(&path).unwrap();
        let staffing = SqliteStaffing::try_new(&conn).unwrap();
        staffing
            .areas
            .create_area(AreaFields {
                name: Some("Finance".to_string()),
                building: Some("B1".to_string()),
            })
            .unwrap()
            .id
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let area = staffing.areas.get_area(&area_id.to_string()).unwrap();
    assert_eq!(area.name, "Finance");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteAreaRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("areas")));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
