//! External payment gateway.

mod errors;
mod gateway;
mod paypal;

pub use errors::PaymentGatewayError;
pub use gateway::*;
pub use paypal::{PayPalClient, PayPalConfig};
