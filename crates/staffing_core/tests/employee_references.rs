use rusqlite::Connection;
use serde_json::json;
use staffing_core::db::open_db_in_memory;
use staffing_core::{
    AreaFields, DepartmentFields, EmployeeFields, ErrorKind, ManagerFields, RecordId,
    ServiceError, SqliteStaffing, ValidationError,
};

fn department(staffing: &SqliteStaffing<'_>, name: &str) -> RecordId {
    let area = staffing
        .areas
        .create_area(AreaFields {
            name: Some("Finance".to_string()),
            building: Some("B1".to_string()),
        })
        .unwrap();
    let manager = staffing
        .managers
        .create_manager(ManagerFields {
            name: Some("J. Doe".to_string()),
            education: Some("MBA".to_string()),
            shift: Some("day".to_string()),
        })
        .unwrap();
    staffing
        .departments
        .create_department(DepartmentFields {
            name: Some(name.to_string()),
            area: Some(area.id.to_string()),
            manager: Some(manager.id.to_string()),
        })
        .unwrap()
        .id
}

fn alice(departments: &[RecordId]) -> EmployeeFields {
    EmployeeFields {
        name: Some("Alice".to_string()),
        surname: Some("Smith".to_string()),
        age: Some(34),
        gender: Some("female".to_string()),
        departments: Some(departments.iter().map(RecordId::to_string).collect()),
    }
}

fn employee_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn get_expands_departments_two_levels_deep() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");

    let created = staffing
        .employees
        .create_employee(alice(&[accounting]))
        .unwrap();
    assert_eq!(created.departments, vec![accounting]);

    let view = staffing
        .employees
        .get_employee(&created.id.to_string())
        .unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["name"], "Alice");
    assert_eq!(json["age"], 34);
    assert_eq!(json["departments"][0]["name"], "Accounting");
    assert_eq!(json["departments"][0]["area"]["building"], "B1");
    assert_eq!(json["departments"][0]["manager"]["shift"], "day");
}

#[test]
fn one_unknown_department_rejects_the_whole_create() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let unknown = RecordId::generate();

    let err = staffing
        .employees
        .create_employee(alice(&[accounting, unknown]))
        .unwrap_err();

    match err {
        ServiceError::Validation(ValidationError::UnresolvedReference {
            field,
            position,
            id,
        }) => {
            assert_eq!(field, "departments");
            assert_eq!(position, Some(1));
            assert_eq!(id, unknown);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(employee_count(&conn), 0);
}

#[test]
fn order_and_duplicates_survive_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let first = department(&staffing, "Accounting");
    let second = department(&staffing, "Payroll");
    let ids = [second, first, second];

    let created = staffing.employees.create_employee(alice(&ids)).unwrap();
    assert_eq!(created.departments, ids.to_vec());

    let view = staffing
        .employees
        .get_employee(&created.id.to_string())
        .unwrap();
    let names: Vec<_> = view
        .departments
        .iter()
        .map(|department| department.resolved().unwrap().name.clone())
        .collect();
    assert_eq!(names, vec!["Payroll", "Accounting", "Payroll"]);
}

#[test]
fn empty_department_list_is_accepted_but_absent_list_is_not() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let created = staffing.employees.create_employee(alice(&[])).unwrap();
    assert!(created.departments.is_empty());

    let err = staffing
        .employees
        .create_employee(EmployeeFields {
            departments: None,
            ..alice(&[])
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(employee_count(&conn), 1);
}

#[test]
fn negative_age_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let err = staffing
        .employees
        .create_employee(EmployeeFields {
            age: Some(-1),
            ..alice(&[])
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(employee_count(&conn), 0);
}

#[test]
fn partial_update_keeps_unsupplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let created = staffing
        .employees
        .create_employee(alice(&[accounting]))
        .unwrap();

    let updated = staffing
        .employees
        .update_employee(
            &created.id.to_string(),
            serde_json::from_value(json!({"name": "New Name"})).unwrap(),
        )
        .unwrap();

    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.surname, "Smith");
    assert_eq!(updated.age, 34);
    assert_eq!(updated.departments, vec![accounting]);
}

#[test]
fn update_with_unknown_department_leaves_links_untouched() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let created = staffing
        .employees
        .create_employee(alice(&[accounting]))
        .unwrap();
    let id = created.id.to_string();

    let err = staffing
        .employees
        .update_employee(
            &id,
            EmployeeFields {
                departments: Some(vec![RecordId::generate().to_string()]),
                ..EmployeeFields::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let view = staffing.employees.get_employee(&id).unwrap();
    assert_eq!(view.departments.len(), 1);
    assert_eq!(view.departments[0].target_id(), accounting);
}

#[test]
fn deleted_department_reads_back_as_missing_marker() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let payroll = department(&staffing, "Payroll");
    let created = staffing
        .employees
        .create_employee(alice(&[accounting, payroll]))
        .unwrap();

    staffing
        .departments
        .delete_department(&accounting.to_string())
        .unwrap();

    let listed = staffing.employees.list_employees().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    let json = serde_json::to_value(&listed[0]).unwrap();
    assert_eq!(
        json["departments"][0],
        json!({"id": accounting.to_string(), "missing": true})
    );
    assert_eq!(json["departments"][1]["name"], "Payroll");
}

#[test]
fn deleting_employee_removes_its_links() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let created = staffing
        .employees
        .create_employee(alice(&[accounting, accounting]))
        .unwrap();
    let id = created.id.to_string();

    staffing.employees.delete_employee(&id).unwrap();

    let links: i64 = conn
        .query_row("SELECT COUNT(*) FROM employee_departments;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(links, 0);
    assert_eq!(
        staffing.employees.delete_employee(&id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn malformed_department_id_in_payload_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();

    let mut fields = alice(&[]);
    fields.departments = Some(vec!["12345".to_string()]);
    let err = staffing.employees.create_employee(fields).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert!(err.to_string().contains("departments[0]"), "{err}");
}

#[test]
fn rename_succeeds_after_department_is_deleted() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let created = staffing
        .employees
        .create_employee(alice(&[accounting]))
        .unwrap();
    let id = created.id.to_string();
    staffing
        .departments
        .delete_department(&accounting.to_string())
        .unwrap();

    let updated = staffing
        .employees
        .update_employee(
            &id,
            serde_json::from_value(json!({"name": "New Name"})).unwrap(),
        )
        .unwrap();
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.departments, vec![accounting]);

    let json = serde_json::to_value(staffing.employees.get_employee(&id).unwrap()).unwrap();
    assert_eq!(json["name"], "New Name");
    assert_eq!(
        json["departments"],
        json!([{"id": accounting.to_string(), "missing": true}])
    );
}

#[test]
fn list_attaches_each_employee_its_own_departments() {
    let conn = open_db_in_memory().unwrap();
    let staffing = SqliteStaffing::try_new(&conn).unwrap();
    let accounting = department(&staffing, "Accounting");
    let payroll = department(&staffing, "Payroll");

    let first = staffing
        .employees
        .create_employee(alice(&[payroll, accounting]))
        .unwrap();
    let second = staffing.employees.create_employee(alice(&[])).unwrap();
    let third = staffing
        .employees
        .create_employee(alice(&[accounting, accounting]))
        .unwrap();

    let listed = staffing.employees.list_employees().unwrap();
    let lists: Vec<_> = listed
        .iter()
        .map(|employee| {
            let ids: Vec<RecordId> = employee
                .departments
                .iter()
                .map(|department| department.target_id())
                .collect();
            (employee.id, ids)
        })
        .collect();

    assert_eq!(
        lists,
        vec![
            (first.id, vec![payroll, accounting]),
            (second.id, vec![]),
            (third.id, vec![accounting, accounting]),
        ]
    );
}
