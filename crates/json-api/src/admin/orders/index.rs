//! Admin Orders Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Envelope, PageResponse},
    errors::ApiError,
    extensions::*,
    orders::OrderResponse,
    state::State,
};

/// List every order, newest first.
#[endpoint(
    tags("admin"),
    summary = "List All Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PageResponse<OrderResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders = state
        .app
        .orders
        .list_orders(state.page(page.into_inner()))
        .await?;

    Ok(Json(Envelope::ok(
        "Orders fetched",
        PageResponse::from_paginated(orders),
    )))
}
