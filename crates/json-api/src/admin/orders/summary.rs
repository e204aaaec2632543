//! Admin Order Summary Handler

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use topup_app::domain::orders::{
    data::SummaryRange,
    records::{MonthlySales, OrderSummary},
};

use crate::{
    envelope::Envelope, errors::ApiError, extensions::*, orders::OrderResponse, state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MonthlySalesResponse {
    /// `YYYY-MM`
    pub month: String,
    #[salvo(schema(value_type = f64))]
    pub total: Decimal,
}

impl From<MonthlySales> for MonthlySalesResponse {
    fn from(sales: MonthlySales) -> Self {
        Self {
            month: sales.month,
            total: sales.total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderSummaryResponse {
    #[salvo(schema(value_type = f64))]
    pub total_sales: Decimal,
    pub orders_count: u64,
    pub users_count: u64,
    pub products_count: u64,
    pub monthly_sales: Vec<MonthlySalesResponse>,
    pub latest_orders: Vec<OrderResponse>,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            total_sales: summary.total_sales,
            orders_count: summary.orders_count,
            users_count: summary.users_count,
            products_count: summary.products_count,
            monthly_sales: summary.monthly_sales.into_iter().map(Into::into).collect(),
            latest_orders: summary.latest_orders.into_iter().map(Into::into).collect(),
        }
    }
}

fn parse_bound(name: &str, value: Option<String>) -> Result<Option<Timestamp>, ApiError> {
    value
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .map_err(|error| ApiError::bad_request(format!("could not parse \"{name}\": {error}")))
}

/// Sales overview over paid orders, optionally limited to a `paid_at` window.
#[endpoint(
    tags("admin"),
    summary = "Order Summary",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderSummaryResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let range = SummaryRange {
        from: parse_bound("from", from.into_inner())?,
        to: parse_bound("to", to.into_inner())?,
    };

    let summary = state.app.orders.order_summary(range).await?;

    Ok(Json(Envelope::ok("Summary fetched", summary.into())))
}
