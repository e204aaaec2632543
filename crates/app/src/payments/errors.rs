//! Payment gateway errors.

use thiserror::Error;

use crate::errors::{ClassifiedError, ErrorClass};

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response.
    #[error("gateway request failed with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The gateway answered 2xx with a body we could not use.
    #[error("unexpected response from gateway: {0}")]
    UnexpectedResponse(String),
}

impl ClassifiedError for PaymentGatewayError {
    fn class(&self) -> ErrorClass {
        ErrorClass::ExternalPayment
    }
}
