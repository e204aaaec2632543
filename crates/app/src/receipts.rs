//! Purchase receipts.
//!
//! Dispatched after a payment commits. A failed dispatch is logged and
//! otherwise ignored; it never affects the payment.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::orders::records::OrderRecord;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("order has no recipient")]
    NoRecipient,

    #[error("receipt delivery failed: {0}")]
    Delivery(String),
}

#[automock]
#[async_trait]
pub trait ReceiptSender: Send + Sync {
    /// Deliver the receipt for a paid order.
    async fn send_purchase_receipt(&self, order: &OrderRecord) -> Result<(), ReceiptError>;
}

/// Writes receipts to the log. Stands in until a mail transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReceiptSender;

#[async_trait]
impl ReceiptSender for LogReceiptSender {
    async fn send_purchase_receipt(&self, order: &OrderRecord) -> Result<(), ReceiptError> {
        let user = order.user.as_ref().ok_or(ReceiptError::NoRecipient)?;

        info!(
            order = %order.uuid,
            email = %user.email,
            total = %order.total_price,
            items = order.items.len(),
            "purchase receipt sent"
        );

        Ok(())
    }
}

/// Send the receipt for `order`, logging instead of returning any failure.
pub(crate) async fn dispatch_receipt(sender: &dyn ReceiptSender, order: &OrderRecord) {
    if order.user.is_none() {
        return;
    }

    if let Err(error) = sender.send_purchase_receipt(order).await {
        warn!(order = %order.uuid, %error, "failed to send purchase receipt");
    }
}
