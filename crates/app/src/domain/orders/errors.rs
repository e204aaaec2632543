//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::errors::{ClassifiedError, ErrorClass};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid player id: {0:?}")]
    InvalidPlayerId(String),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("price must not be negative")]
    InvalidPrice,

    #[error("order total exceeds the maximum amount")]
    AmountTooLarge,

    #[error("submitted prices do not match the current catalogue")]
    PriceMismatch,

    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient stock")]
    InsufficientStock,

    #[error("order is already paid")]
    AlreadyPaid,

    #[error("order belongs to another user")]
    Forbidden,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid order data")]
    InvalidData,

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
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl ClassifiedError for OrdersServiceError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyCart
            | Self::InvalidPlayerId(_)
            | Self::InvalidQuantity
            | Self::InvalidPrice
            | Self::AmountTooLarge
            | Self::PriceMismatch
            | Self::InvalidData => ErrorClass::Validation,
            Self::NotFound | Self::UserNotFound | Self::ProductNotFound | Self::InvalidReference => {
                ErrorClass::NotFound
            }
            Self::InsufficientBalance => ErrorClass::InsufficientFunds,
            Self::InsufficientStock | Self::AlreadyPaid | Self::AlreadyExists => {
                ErrorClass::Conflict
            }
            Self::Forbidden => ErrorClass::Auth,
            Self::Sql(_) => ErrorClass::Storage,
        }
    }
}
