//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Orders service error variants.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Order was not found.
    #[error("not found")]
    NotFound,

    /// A conflicting row already exists.
    #[error("already exists")]
    AlreadyExists,

    /// Referenced related row does not exist.
    #[error("related resource not found")]
    InvalidReference,

    /// Required data was missing.
    #[error("missing required data")]
    MissingRequiredData,

    /// Provided data failed validation.
    #[error("invalid data")]
    InvalidData,

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
