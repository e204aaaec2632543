//! Error taxonomy shared by every service.

/// Coarse class of a failure, used by callers to decide how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed or inconsistent input.
    Validation,

    /// Missing or insufficient credentials.
    Auth,

    /// A referenced order, user, product or transaction does not exist.
    NotFound,

    /// Balance or stock cannot cover the request.
    InsufficientFunds,

    /// The payment gateway failed or declined.
    ExternalPayment,

    /// The operation was already applied (double capture, already paid).
    Conflict,

    /// Storage failure.
    Storage,
}

/// Implemented by service errors so callers can classify them without matching every variant.
pub trait ClassifiedError: std::error::Error {
    fn class(&self) -> ErrorClass;
}

/// A stored or submitted enum value that is not recognised.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}
