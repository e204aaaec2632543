//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    auth::ApiTokenError,
    errors::{ClassifiedError, ErrorClass},
};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown, malformed, revoked or expired token.
    #[error("token not found")]
    NotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] ApiTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UserNotFound,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}

impl ClassifiedError for AuthServiceError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound | Self::Token(_) => ErrorClass::Auth,
            Self::UserNotFound => ErrorClass::NotFound,
            Self::Sql(_) => ErrorClass::Storage,
        }
    }
}
