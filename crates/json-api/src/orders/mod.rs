//! Orders

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
mod models;
pub(crate) mod pay;

pub(crate) use models::*;

use topup_app::domain::orders::OrdersServiceError;

use crate::errors::ApiError;

/// Like `ApiError::from`, but an order owned by someone else is 403 rather than 401.
pub(crate) fn order_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::Forbidden => ApiError::forbidden(error.to_string()),
        other => other.into(),
    }
}
