//! Admin Delete Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    envelope::Acknowledgement, errors::ApiError, extensions::*, orders::order_error, state::State,
};

/// Delete an order with its items and audit rows. Wallet history is kept.
#[endpoint(
    tags("admin"),
    summary = "Delete Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Acknowledgement>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();

    state
        .app
        .orders
        .delete_order(order.into())
        .await
        .map_err(order_error)?;

    info!(%order, "order deleted");

    Ok(Json(Acknowledgement::ok("Order deleted")))
}
