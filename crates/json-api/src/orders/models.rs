//! Order request and response bodies.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use topup_app::domain::orders::{
    data::{NewOrder, NewOrderItem},
    records::{
        OrderItemRecord, OrderRecord, OrderStatusChangeRecord, OrderUser, OrderUuid,
        PaymentMethod,
    },
};

use crate::errors::ApiError;

/// One cart line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemRequest {
    #[serde(alias = "productId")]
    pub product: Uuid,
    pub player_id: String,
    pub quantity: u32,

    /// Unit price the client displayed
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,
}

/// Order creation body. Totals are optional and checked when present.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,

    /// `balance` (or `wallet`), `paypal` or `manual`
    pub payment_method: String,
    #[serde(default)]
    #[salvo(schema(value_type = Option<f64>))]
    pub items_price: Option<Decimal>,
    #[serde(default)]
    #[salvo(schema(value_type = Option<f64>))]
    pub tax_price: Option<Decimal>,
    #[serde(default)]
    #[salvo(schema(value_type = Option<f64>))]
    pub total_price: Option<Decimal>,
}

impl CreateOrderRequest {
    /// Convert into service input under a fresh order id.
    pub(crate) fn into_new_order(self) -> Result<NewOrder, ApiError> {
        let payment_method = PaymentMethod::parse_input(&self.payment_method)
            .map_err(|error| ApiError::unprocessable(error.to_string()))?;

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            items: self
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product: item.product.into(),
                    player_id: item.player_id,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            payment_method,
            items_price: self.items_price,
            tax_price: self.tax_price,
            total_price: self.total_price,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderCreatedResponse {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<OrderUser> for OrderUserResponse {
    fn from(user: OrderUser) -> Self {
        Self {
            id: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product: Uuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub player_id: String,
    pub quantity: u32,
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,

    /// Stock level when the order was placed
    pub count_in_stock: u32,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            product: item.product.into_uuid(),
            name: item.name,
            slug: item.slug,
            category: item.category,
            image: item.image,
            player_id: item.player_id,
            quantity: item.quantity,
            price: item.price,
            count_in_stock: item.count_in_stock,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,

    /// Absent once the owner has been deleted
    pub user: Option<OrderUserResponse>,
    pub items: Vec<OrderItemResponse>,
    #[salvo(schema(value_type = f64))]
    pub items_price: Decimal,
    #[salvo(schema(value_type = f64))]
    pub tax_price: Decimal,
    #[salvo(schema(value_type = f64))]
    pub total_price: Decimal,
    pub payment_method: String,
    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub status: String,
    #[salvo(schema(value_type = f64))]
    pub balance_used: Decimal,

    /// Balance left after the debit that paid this order
    #[salvo(schema(value_type = Option<f64>))]
    pub balance: Option<Decimal>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            user: order.user.map(Into::into),
            items: order.items.into_iter().map(Into::into).collect(),
            items_price: order.items_price,
            tax_price: order.tax_price,
            total_price: order.total_price,
            payment_method: order.payment_method.to_string(),
            is_paid: order.is_paid,
            paid_at: order.paid_at.map(|at| at.to_string()),
            status: order.status.to_string(),
            balance_used: order.balance_used,
            balance: order.balance_snapshot,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderStatusChangeResponse {
    pub from: String,
    pub to: String,
    pub changed_by: Option<Uuid>,
    pub created_at: String,
}

impl From<OrderStatusChangeRecord> for OrderStatusChangeResponse {
    fn from(change: OrderStatusChangeRecord) -> Self {
        Self {
            from: change.from.to_string(),
            to: change.to.to_string(),
            changed_by: change.changed_by.map(Into::into),
            created_at: change.created_at.to_string(),
        }
    }
}
