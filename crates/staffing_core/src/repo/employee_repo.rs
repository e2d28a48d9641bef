//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist employee rows plus their ordered department list.
//!
//! # Invariants
//! - `employee_departments` rows are rewritten as a whole on every update,
//!   in one immediate transaction with the employee row.
//! - `position` preserves caller order; duplicate department ids are kept.
//! - Listing reads all link rows in one ordered scan and attaches them.
//! - Link rows go away with their employee (`ON DELETE CASCADE`); department
//!   ids inside them are never checked here.

use crate::model::employee::{Employee, EmployeeData};
use crate::model::id::RecordId;
use crate::repo::{
    ensure_tables, expect_changed, parse_stored_id, RepoError, RepoResult, NOW_EPOCH_MS_SQL,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeMap;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    surname,
    age,
    gender,
    created_at,
    updated_at
FROM employees";

/// Storage contract for employee records.
pub trait EmployeeRepository {
    fn create_employee(&self, data: &EmployeeData) -> RepoResult<RecordId>;
    fn get_employee(&self, id: RecordId) -> RepoResult<Option<Employee>>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Replaces all fields, including the full department list.
    fn update_employee(&self, id: RecordId, data: &EmployeeData) -> RepoResult<()>;
    fn delete_employee(&self, id: RecordId) -> RepoResult<()>;
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for &R {
    fn create_employee(&self, data: &EmployeeData) -> RepoResult<RecordId> {
        (**self).create_employee(data)
    }

    fn get_employee(&self, id: RecordId) -> RepoResult<Option<Employee>> {
        (**self).get_employee(id)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        (**self).list_employees()
    }

    fn update_employee(&self, id: RecordId, data: &EmployeeData) -> RepoResult<()> {
        (**self).update_employee(id, data)
    }

    fn delete_employee(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete_employee(id)
    }
}

/// SQLite-backed employee repository.
#[derive(Clone, Copy)]
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["employees", "employee_departments"])?;
        Ok(Self { conn })
    }

    fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, data: &EmployeeData) -> RepoResult<RecordId> {
        data.validate()?;

        let id = RecordId::generate();
        let id_text = id.to_string();
        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO employees (id, name, surname, age, gender)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id_text.as_str(),
                data.name.as_str(),
                data.surname.as_str(),
                data.age,
                data.gender.as_str(),
            ],
        )?;
        insert_department_links(&tx, &id_text, &data.departments)?;
        tx.commit()?;

        Ok(id)
    }

    fn get_employee(&self, id: RecordId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let id_text = id.to_string();
        let mut rows = stmt.query([id_text.as_str()])?;
        if let Some(row) = rows.next()? {
            let mut employee = parse_employee_row(row)?;
            employee.departments = load_department_links(self.conn, &id_text)?;
            return Ok(Some(employee));
        }
        Ok(None)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        let mut links = load_all_department_links(self.conn)?;
        for employee in &mut employees {
            employee.departments = links.remove(&employee.id).unwrap_or_default();
        }
        Ok(employees)
    }

    fn update_employee(&self, id: RecordId, data: &EmployeeData) -> RepoResult<()> {
        data.validate()?;

        let id_text = id.to_string();
        let tx = self.write_tx()?;
        let changed = tx.execute(
            &format!(
                "UPDATE employees
                 SET
                    name = ?1,
                    surname = ?2,
                    age = ?3,
                    gender = ?4,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?5;"
            ),
            params![
                data.name.as_str(),
                data.surname.as_str(),
                data.age,
                data.gender.as_str(),
                id_text.as_str(),
            ],
        )?;
        expect_changed(changed, id)?;

        tx.execute(
            "DELETE FROM employee_departments WHERE employee_id = ?1;",
            [id_text.as_str()],
        )?;
        insert_department_links(&tx, &id_text, &data.departments)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_employee(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id.to_string()])?;
        expect_changed(changed, id)
    }
}

fn insert_department_links(
    tx: &Transaction<'_>,
    employee_id: &str,
    departments: &[RecordId],
) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO employee_departments (employee_id, position, department_id)
         VALUES (?1, ?2, ?3);",
    )?;
    for (position, department) in departments.iter().enumerate() {
        let position = i64::try_from(position).map_err(|_| {
            RepoError::InvalidData(format!(
                "department list too long for employee {employee_id}"
            ))
        })?;
        stmt.execute(params![employee_id, position, department.to_string()])?;
    }
    Ok(())
}

/// Employee columns only; `departments` is left empty for the caller to fill.
fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id_text: String = row.get("id")?;
    let age: i64 = row.get("age")?;
    if age < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative age `{age}` in employees.age for {id_text}"
        )));
    }

    Ok(Employee {
        id: parse_stored_id(&id_text, "employees.id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        age,
        gender: row.get("gender")?,
        departments: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_department_links(conn: &Connection, employee_id: &str) -> RepoResult<Vec<RecordId>> {
    let mut stmt = conn.prepare(
        "SELECT department_id
         FROM employee_departments
         WHERE employee_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([employee_id])?;
    let mut departments = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        departments.push(parse_stored_id(
            &value,
            "employee_departments.department_id",
        )?);
    }
    Ok(departments)
}

/// Every employee's ordered department list, read in one scan.
fn load_all_department_links(conn: &Connection) -> RepoResult<BTreeMap<RecordId, Vec<RecordId>>> {
    let mut stmt = conn.prepare(
        "SELECT employee_id, department_id
         FROM employee_departments
         ORDER BY employee_id ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut links: BTreeMap<RecordId, Vec<RecordId>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let employee_text: String = row.get(0)?;
        let department_text: String = row.get(1)?;
        links
            .entry(parse_stored_id(&employee_text, "employee_departments.employee_id")?)
            .or_default()
            .push(parse_stored_id(
                &department_text,
                "employee_departments.department_id",
            )?);
    }
    Ok(links)
}
