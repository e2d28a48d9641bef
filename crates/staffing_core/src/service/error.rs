//! Service-level error classification.
//!
//! # Invariants
//! - Every failure is classified where it originates into one of four kinds.
//! - Dangling references on reads are data, never errors.

use crate::model::id::{InvalidRecordId, RecordId};
use crate::model::validation::ValidationError;
use crate::repo::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entity type named in not-found errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Area,
    Manager,
    Department,
    Employee,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Manager => "manager",
            Self::Department => "department",
            Self::Employee => "employee",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse failure class that callers map to transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input: missing/blank field or unresolved reference.
    ValidationError,
    /// Primary record absent from its own store.
    NotFound,
    /// Id text not well-formed; raised before any store access.
    InvalidIdentifier,
    /// Store unreachable or returning unusable data.
    StorageUnavailable,
}

impl ErrorKind {
    /// Conventional HTTP status for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::ValidationError | Self::InvalidIdentifier => 400,
            Self::NotFound => 404,
            Self::StorageUnavailable => 503,
        }
    }
}

/// Serializable error payload handed to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

/// Error returned by every service operation.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound { entity: EntityKind, id: RecordId },
    InvalidIdentifier(InvalidRecordId),
    StorageUnavailable(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        ErrorDescriptor {
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    /// Classifies a repository failure for `entity`.
    pub fn from_repo(entity: EntityKind, err: RepoError) -> Self {
        match err {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound { entity, id },
            other => Self::StorageUnavailable(other),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidIdentifier(err) => write!(f, "invalid identifier: {err}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidIdentifier(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidRecordId> for ServiceError {
    fn from(value: InvalidRecordId) -> Self {
        Self::InvalidIdentifier(value)
    }
}

/// Attaches the entity kind when lifting repository results.
pub(crate) trait RepoResultExt<T> {
    fn for_entity(self, entity: EntityKind) -> ServiceResult<T>;
}

impl<T> RepoResultExt<T> for RepoResult<T> {
    fn for_entity(self, entity: EntityKind) -> ServiceResult<T> {
        self.map_err(|err| ServiceError::from_repo(entity, err))
    }
}

/// Parses a caller-supplied id before any storage access.
pub(crate) fn parse_id(value: &str) -> ServiceResult<RecordId> {
    Ok(RecordId::parse(value)?)
}

/// Re-reads a record right after writing it.
///
/// A miss here means the row vanished between statements (accepted race);
/// it surfaces as storage trouble rather than as the caller's not-found.
pub(crate) fn read_back<T>(
    entity: EntityKind,
    id: RecordId,
    loaded: RepoResult<Option<T>>,
) -> ServiceResult<T> {
    loaded.for_entity(entity)?.ok_or_else(|| {
        ServiceError::StorageUnavailable(RepoError::InvalidData(format!(
            "{entity} {id} missing on read-back"
        )))
    })
}
