//! Use-case services.
//!
//! # Responsibility
//! - Turn caller payloads and id text into validated repository calls.
//! - Own cross-entity rules: reference checks on writes, expansion on reads.
//! - Classify every failure into a `ServiceError` kind.
//!
//! # Invariants
//! - Services stay storage-agnostic; they see repositories only via traits.
//! - No service holds state between calls beyond its repositories.

pub mod area_service;
pub mod department_service;
pub mod employee_service;
pub mod error;
pub mod manager_service;
pub mod staffing;
