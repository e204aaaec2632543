//! Orders Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::{
    orders::records::{OrderUuid, PaymentMethod},
    products::records::ProductUuid,
};

/// One cart line submitted by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product: ProductUuid,
    pub player_id: String,
    pub quantity: u32,

    /// Unit price the client saw. Must match the catalogue.
    pub price: Decimal,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderItem>,
    pub payment_method: PaymentMethod,

    /// Totals the client displayed, checked against the computed ones when present.
    pub items_price: Option<Decimal>,
    pub tax_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
}

/// Inclusive `paid_at` window for the admin summary. Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
