//! Field and reference validation shared by all entity write paths.

use crate::model::id::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reason for a create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent from the payload.
    MissingField(&'static str),
    /// Required text field present but blank after trim.
    BlankField(&'static str),
    /// Integer field below its lower bound.
    NegativeValue { field: &'static str, value: i64 },
    /// Reference field text is not a well-formed record id.
    MalformedReference {
        field: &'static str,
        position: Option<usize>,
        value: String,
    },
    /// Reference field names a record that does not exist.
    UnresolvedReference {
        field: &'static str,
        position: Option<usize>,
        id: RecordId,
    },
}

impl ValidationError {
    /// Name of the offending payload field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) | Self::BlankField(field) => field,
            Self::NegativeValue { field, .. }
            | Self::MalformedReference { field, .. }
            | Self::UnresolvedReference { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::BlankField(field) => write!(f, "field `{field}` must not be empty"),
            Self::NegativeValue { field, value } => {
                write!(f, "field `{field}` must be >= 0, got {value}")
            }
            Self::MalformedReference {
                field,
                position,
                value,
            } => write!(
                f,
                "field `{}` holds malformed id `{value}`",
                indexed(field, *position)
            ),
            Self::UnresolvedReference {
                field,
                position,
                id,
            } => write!(
                f,
                "field `{}` references unknown record {id}",
                indexed(field, *position)
            ),
        }
    }
}

impl Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn indexed(field: &str, position: Option<usize>) -> String {
    match position {
        Some(index) => format!("{field}[{index}]"),
        None => field.to_string(),
    }
}

/// Unwraps a required payload value.
pub(crate) fn require<T>(field: &'static str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Rejects blank text.
pub(crate) fn check_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Rejects negative integers.
pub(crate) fn check_non_negative(field: &'static str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(())
}

/// Parses reference text into an id without consulting storage.
pub(crate) fn parse_reference(
    field: &'static str,
    position: Option<usize>,
    value: &str,
) -> ValidationResult<RecordId> {
    RecordId::parse(value).map_err(|err| ValidationError::MalformedReference {
        field,
        position,
        value: err.value,
    })
}

/// Parses an ordered reference list, keeping duplicates.
pub(crate) fn parse_references(
    field: &'static str,
    values: &[String],
) -> ValidationResult<Vec<RecordId>> {
    values
        .iter()
        .enumerate()
        .map(|(position, value)| parse_reference(field, Some(position), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{check_text, parse_references, ValidationError};
    use crate::model::id::RecordId;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            check_text("name", "   ").unwrap_err(),
            ValidationError::BlankField("name")
        );
        assert!(check_text("name", "Finance").is_ok());
    }

    #[test]
    fn reference_list_keeps_order_and_duplicates() {
        let first = RecordId::generate();
        let second = RecordId::generate();
        let values = vec![first.to_string(), second.to_string(), first.to_string()];
        assert_eq!(
            parse_references("departments", &values).unwrap(),
            vec![first, second, first]
        );
    }

    #[test]
    fn malformed_reference_reports_position() {
        let values = vec![RecordId::generate().to_string(), "bogus".to_string()];
        let err = parse_references("departments", &values).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedReference {
                field: "departments",
                position: Some(1),
                value: "bogus".to_string(),
            }
        );
        assert_eq!(err.to_string(), "field `departments[1]` holds malformed id `bogus`");
    }
}
