use rusqlite::params;
use staffing_core::db::open_db_in_memory;
use staffing_core::{
    AreaFields, AreaRepository, EntityKind, ErrorKind, ManagerFields, RecordId, ServiceError,
    SqliteAreaRepository, SqliteStaffing,
};

fn finance() -> AreaFields {
    AreaFields {
        name: Some("Finance".to_string()),
        building: Some("B1".to_string()),
    }
}

fn doe() -> ManagerFields {
    ManagerFields {
        name: Some("J. Doe".to_string()),
        education: Some("MBA".to_string()),
        shift: Some("day".to_string()),
    }
}

#[test]
fn create_then_get_returns_same_area() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let created = staffing.areas.create_area(finance()).unwrap();
    let loaded = staffing.areas.get_area(&created.id.to_string()).unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Finance");
    assert_eq!(loaded.building, "B1");
    assert!(loaded.created_at > 0);
    assert_eq!(loaded.created_at, loaded.updated_at);
}

#[test]
fn create_then_get_returns_same_manager() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let created = staffing.managers.create_manager(doe()).unwrap();
    let loaded = staffing
        .managers
        .get_manager(&created.id.to_string())
        .unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.education, "MBA");
    assert_eq!(loaded.shift, "day");
}

#[test]
fn missing_or_blank_fields_are_validation_errors() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let missing = staffing
        .areas
        .create_area(AreaFields {
            name: Some("Finance".to_string()),
            building: None,
        })
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::ValidationError);
    assert!(missing.to_string().contains("building"));

    let blank = staffing
        .managers
        .create_manager(ManagerFields {
            shift: Some("  ".to_string()),
            ..doe()
        })
        .unwrap_err();
    assert_eq!(blank.kind(), ErrorKind::ValidationError);

    assert!(staffing.areas.list_areas().unwrap().is_empty());
    assert!(staffing.managers.list_managers().unwrap().is_empty());
}

#[test]
fn list_returns_records_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let first = staffing.areas.create_area(finance()).unwrap();
    let second = staffing
        .areas
        .create_area(AreaFields {
            name: Some("Logistics".to_string()),
            building: Some("B2".to_string()),
        })
        .unwrap();

    let ids: Vec<_> = staffing
        .areas
        .list_areas()
        .unwrap()
        .into_iter()
        .map(|area| area.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn partial_update_merges_and_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let created = staffing.managers.create_manager(doe()).unwrap();
    conn.execute(
        "UPDATE managers SET updated_at = 0 WHERE id = ?1;",
        params![created.id.to_string()],
    )
    .unwrap();

    let updated = staffing
        .managers
        .update_manager(
            &created.id.to_string(),
            ManagerFields {
                shift: Some("night".to_string()),
                ..ManagerFields::default()
            },
        )
        .unwrap();

    assert_eq!(updated.shift, "night");
    assert_eq!(updated.name, "J. Doe");
    assert_eq!(updated.education, "MBA");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > 0);
}

#[test]
fn update_rejects_blanking_a_required_field() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let created = staffing.areas.create_area(finance()).unwrap();

    let err = staffing
        .areas
        .update_area(
            &created.id.to_string(),
            AreaFields {
                name: Some(String::new()),
                building: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let unchanged = staffing.areas.get_area(&created.id.to_string()).unwrap();
    assert_eq!(unchanged.name, "Finance");
}

#[test]
fn delete_twice_reports_not_found_second_time() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let id = staffing.areas.create_area(finance()).unwrap().id.to_string();

    staffing.areas.delete_area(&id).unwrap();
    let err = staffing.areas.delete_area(&id).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: EntityKind::Area,
            ..
        }
    ));
    assert_eq!(
        staffing.areas.get_area(&id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn malformed_ids_are_rejected_uniformly() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let bad = "660c8e5b9f8a95e8fddbfcc1";

    let errors = [
        staffing.areas.get_area(bad).unwrap_err(),
        staffing.areas.update_area(bad, finance()).unwrap_err(),
        staffing.areas.delete_area(bad).unwrap_err(),
        staffing.managers.get_manager(bad).unwrap_err(),
        staffing.managers.update_manager(bad, doe()).unwrap_err(),
        staffing.managers.delete_manager(bad).unwrap_err(),
        staffing.departments.get_department(bad).unwrap_err(),
        staffing.departments.delete_department(bad).unwrap_err(),
        staffing.employees.get_employee(bad).unwrap_err(),
        staffing.employees.delete_employee(bad).unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "{err}");
    }
}

#[test]
fn unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let unknown = RecordId::generate().to_string();

    let err = staffing.managers.update_manager(&unknown, doe()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.descriptor().kind.status_code(), 404);
}

#[test]
fn batch_lookup_skips_absent_ids() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let first = staffing.areas.create_area(finance()).unwrap();
    let second = staffing
        .areas
        .create_area(AreaFields {
            name: Some("Logistics".to_string()),
            building: Some("B2".to_string()),
        })
        .unwrap();

    let repo = SqliteAreaRepository::try_new(&conn).unwrap();
    let found = repo
        .get_areas(&[second.id, RecordId::generate(), first.id])
        .unwrap();

    assert_eq!(found, vec![first, second]);
    assert!(repo.get_areas(&[]).unwrap().is_empty());
}
