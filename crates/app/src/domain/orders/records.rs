//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Status Change UUID
pub type OrderStatusChangeUuid = TypedUuid<OrderStatusChangeRecord>;

/// Fulfilment state, set by administrators. Independent of `is_paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Rejected,
}

text_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Completed => "completed",
    Rejected => "rejected",
});

/// How an order is (or will be) settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Balance,
    PayPal,
    Manual,
}

text_enum!(PaymentMethod, "payment method", {
    Balance => "balance",
    PayPal => "paypal",
    Manual => "manual",
});

impl PaymentMethod {
    /// Parse client input, accepting `wallet` for the balance.
    ///
    /// # Errors
    ///
    /// Returns an error for unrecognised methods.
    pub fn parse_input(value: &str) -> Result<Self, crate::errors::UnknownValue> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wallet" => Ok(Self::Balance),
            other => other.parse(),
        }
    }
}

/// Owner details joined onto an order. Absent once the user is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
}

/// Snapshot of a product at the time it was ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    pub product: ProductUuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub player_id: String,
    pub quantity: u32,
    pub price: Decimal,
    pub count_in_stock: u32,
}

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user: Option<OrderUser>,
    pub items: Vec<OrderItemRecord>,
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub status: OrderStatus,
    pub balance_used: Decimal,

    /// Balance left after the debit that paid this order.
    pub balance_snapshot: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    #[must_use]
    pub fn owner(&self) -> Option<UserUuid> {
        self.user.as_ref().map(|user| user.uuid)
    }
}

/// Audit row written whenever an administrator changes an order's status.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatusChangeRecord {
    pub uuid: OrderStatusChangeUuid,
    pub order: OrderUuid,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub changed_by: Option<UserUuid>,
    pub created_at: Timestamp,
}

/// Paid sales in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub total: Decimal,
}

/// Admin overview.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub total_sales: Decimal,
    pub orders_count: u64,
    pub users_count: u64,
    pub products_count: u64,
    pub monthly_sales: Vec<MonthlySales>,
    pub latest_orders: Vec<OrderRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_is_an_alias_for_balance() {
        assert_eq!(
            PaymentMethod::parse_input("wallet").ok(),
            Some(PaymentMethod::Balance)
        );
        assert_eq!(
            PaymentMethod::parse_input("Balance").ok(),
            Some(PaymentMethod::Balance)
        );
        assert_eq!(
            PaymentMethod::parse_input("PayPal").ok(),
            Some(PaymentMethod::PayPal)
        );
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        assert!(PaymentMethod::parse_input("cheque").is_err());
    }

    #[test]
    fn statuses_serialise_lowercase() {
        assert_eq!(OrderStatus::Completed.to_string(), "completed");
        assert_eq!("rejected".parse::<OrderStatus>().ok(), Some(OrderStatus::Rejected));
    }
}
