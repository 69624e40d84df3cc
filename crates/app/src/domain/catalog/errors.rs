//! Catalog service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Catalog service error variants.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// A category or product with a conflicting unique field already exists.
    #[error("catalog entry already exists")]
    AlreadyExists,

    /// Category or product was not found.
    #[error("catalog entry not found")]
    NotFound,

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

impl From<Error> for CatalogServiceError {
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
