//! Domain model for the staffing record graph.
//!
//! # Responsibility
//! - Define persisted records, write payloads, and expanded read views for
//!   areas, managers, departments, and employees.
//! - Own field-level validation that needs no storage access.
//!
//! # Invariants
//! - Every record is identified by an immutable `RecordId`.
//! - Reference fields hold ids, never ownership; targets may disappear.
//! - Payload structs (`*Fields`) treat every key as optional. Create paths
//!   require all of them, update paths merge what is supplied.

pub mod area;
pub mod department;
pub mod employee;
pub mod id;
pub mod manager;
pub mod reference;
pub mod validation;
