use crate::Error;
use std::fmt::{self, Display};

/// An entity-shaped input that cannot produce the requested statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("The value has no eligible field for the {statement} statement")]
    NoEligibleFields { statement: &'static str },
    #[error("Field `{field}` lists several columns and cannot be assigned")]
    FanOutAssignment { field: String },
    #[error("Alias `{alias}` is bound to different values")]
    AliasCollision { alias: String },
    #[error("Refusing a {statement} statement without conditions, it would affect every row")]
    UnboundedWrite { statement: &'static str },
}

/// Constraint violations the storage reports with a distinguishable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    DuplicateEntry,
    IncorrectValue,
    ForeignKeyOnInsert,
    ForeignKeyOnDelete,
}

impl ConstraintKind {
    pub const DUPLICATE_ENTRY: u16 = 1062;
    pub const INCORRECT_VALUE: u16 = 1411;
    pub const FOREIGN_KEY_ON_INSERT: u16 = 1452;
    pub const FOREIGN_KEY_ON_DELETE: u16 = 1451;

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            Self::DUPLICATE_ENTRY => Some(Self::DuplicateEntry),
            Self::INCORRECT_VALUE => Some(Self::IncorrectValue),
            Self::FOREIGN_KEY_ON_INSERT => Some(Self::ForeignKeyOnInsert),
            Self::FOREIGN_KEY_ON_DELETE => Some(Self::ForeignKeyOnDelete),
            _ => None,
        }
    }
    pub fn code(&self) -> u16 {
        match self {
            Self::DuplicateEntry => Self::DUPLICATE_ENTRY,
            Self::IncorrectValue => Self::INCORRECT_VALUE,
            Self::ForeignKeyOnInsert => Self::FOREIGN_KEY_ON_INSERT,
            Self::ForeignKeyOnDelete => Self::FOREIGN_KEY_ON_DELETE,
        }
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DuplicateEntry => "duplicate entry",
            Self::IncorrectValue => "incorrect value",
            Self::ForeignKeyOnInsert => "foreign key violation on insert",
            Self::ForeignKeyOnDelete => "foreign key violation on delete",
        })
    }
}

/// Storage constraint violation surfaced by the executor, passed upward unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({code}): {message}")]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub code: u16,
    pub message: String,
}

impl ConstraintViolation {
    /// Build the violation for `code`, `None` when the code is not a constraint one.
    pub fn from_code(code: u16, message: impl Into<String>) -> Option<Self> {
        ConstraintKind::from_code(code).map(|kind| Self {
            kind,
            code,
            message: message.into(),
        })
    }
    /// Find a violation anywhere in the chain of `error`.
    pub fn find(error: &Error) -> Option<&Self> {
        error.chain().find_map(|e| e.downcast_ref::<Self>())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConstraintKind, ConstraintViolation, ShapeError};
    use crate::{Context, Error, Result};

    #[test]
    fn codes() {
        assert_eq!(
            ConstraintKind::from_code(1062),
            Some(ConstraintKind::DuplicateEntry)
        );
        assert_eq!(
            ConstraintKind::from_code(1451),
            Some(ConstraintKind::ForeignKeyOnDelete)
        );
        assert_eq!(ConstraintKind::from_code(1064), None);
        assert_eq!(ConstraintKind::ForeignKeyOnInsert.code(), 1452);
    }

    #[test]
    fn violation_survives_context() {
        let result: Result<()> = Err(Error::new(
            ConstraintViolation::from_code(1062, "Duplicate entry 'a' for key 'name'").unwrap(),
        ));
        let error = result.context("While inserting").unwrap_err();
        let violation = ConstraintViolation::find(&error).unwrap();
        assert_eq!(violation.kind, ConstraintKind::DuplicateEntry);
        assert!(ConstraintViolation::find(&Error::msg("other")).is_none());
    }

    #[test]
    fn shape_messages() {
        let error = ShapeError::NoEligibleFields { statement: "INSERT" };
        assert_eq!(
            error.to_string(),
            "The value has no eligible field for the INSERT statement"
        );
    }
}
