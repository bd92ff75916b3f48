use rusqlite::ffi;
use thiserror::Error;

/// Errors returned by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} named '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("Referenced {entity} {id} does not exist")]
    InvalidReference { entity: &'static str, id: i64 },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn required(field: &'static str) -> Self {
        CatalogError::Validation {
            field,
            reason: "is required".to_string(),
        }
    }
}

/// Kind of constraint a failed statement violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

pub(crate) fn violated_constraint(err: &rusqlite::Error) -> Option<Constraint> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => match e.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => Some(Constraint::Unique),
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
            ffi::SQLITE_CONSTRAINT_CHECK => Some(Constraint::Check),
            ffi::SQLITE_CONSTRAINT_NOTNULL => Some(Constraint::NotNull),
            _ => None,
        },
        _ => None,
    }
}
