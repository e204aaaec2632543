//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::errors::{ClassifiedError, ErrorClass};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("a user with this email already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid user data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl ClassifiedError for UsersServiceError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyExists => ErrorClass::Conflict,
            Self::NotFound => ErrorClass::NotFound,
            Self::MissingRequiredData | Self::InvalidData => ErrorClass::Validation,
            Self::Sql(_) => ErrorClass::Storage,
        }
    }
}
