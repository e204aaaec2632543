//! Gateway abstraction used by the wallet.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::payments::PaymentGatewayError;

/// Capture status reported by the gateway when funds have moved.
pub const CAPTURE_COMPLETED: &str = "COMPLETED";

/// A charge created at the gateway, awaiting payer approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: String,
    pub status: String,
}

/// Outcome of capturing an approved charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCapture {
    pub order_id: String,
    pub status: String,
    pub payer_email: Option<String>,
    pub capture_id: Option<String>,
}

impl GatewayCapture {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == CAPTURE_COMPLETED
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a pending charge for `amount`.
    async fn create_order(&self, amount: Decimal) -> Result<GatewayOrder, PaymentGatewayError>;

    /// Capture a charge the payer has approved.
    async fn capture_order(&self, order_id: &str) -> Result<GatewayCapture, PaymentGatewayError>;
}
