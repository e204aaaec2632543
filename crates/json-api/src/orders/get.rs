//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::warn;
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    orders::{OrderResponse, order_error},
    state::State,
};

/// Get Order Handler
///
/// Visible to the order's owner and to administrators.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(order_error)?;

    if !principal.can_access(order.owner()) {
        warn!(order = %order.uuid, user = %principal.user, "order read denied");

        return Err(ApiError::forbidden("order belongs to another user"));
    }

    Ok(Json(Envelope::ok("Order fetched", order.into())))
}
