//! Wallet service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    errors::{ClassifiedError, ErrorClass},
    payments::PaymentGatewayError,
};

#[derive(Debug, Error)]
pub enum WalletServiceError {
    #[error("amount must be a positive value in whole cents")]
    InvalidAmount,

    #[error("user not found")]
    UserNotFound,

    #[error("wallet transaction not found")]
    TransactionNotFound,

    #[error("payment has already been captured")]
    AlreadyCaptured,

    #[error("balance request has already been reviewed")]
    AlreadyReviewed,

    #[error("amount does not match the pending deposit")]
    AmountMismatch,

    #[error("payment capture was not completed (status {0})")]
    CaptureNotCompleted(String),

    #[error("payment gateway error")]
    Gateway(#[from] PaymentGatewayError),

    #[error("a transaction for this payment already exists")]
    DuplicateTransaction,

    #[error("invalid wallet data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for WalletServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::TransactionNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateTransaction,
            Some(ErrorKind::ForeignKeyViolation) => Self::UserNotFound,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl ClassifiedError for WalletServiceError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidAmount | Self::AmountMismatch | Self::InvalidData => {
                ErrorClass::Validation
            }
            Self::UserNotFound | Self::TransactionNotFound => ErrorClass::NotFound,
            Self::AlreadyCaptured | Self::AlreadyReviewed | Self::DuplicateTransaction => {
                ErrorClass::Conflict
            }
            Self::CaptureNotCompleted(_) | Self::Gateway(_) => ErrorClass::ExternalPayment,
            Self::Sql(_) => ErrorClass::Storage,
        }
    }
}
