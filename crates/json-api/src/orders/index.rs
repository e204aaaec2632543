//! Own Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Envelope, PageResponse},
    errors::ApiError,
    extensions::*,
    orders::OrderResponse,
    state::State,
};

/// List the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PageResponse<OrderResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let orders = state
        .app
        .orders
        .list_user_orders(principal.user, state.page(page.into_inner()))
        .await?;

    Ok(Json(Envelope::ok(
        "Orders fetched",
        PageResponse::from_paginated(orders),
    )))
}
