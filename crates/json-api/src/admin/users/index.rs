//! Admin Users Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    admin::users::UserResponse,
    envelope::{Envelope, PageResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

#[endpoint(
    tags("admin"),
    summary = "List Users",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PageResponse<UserResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let users = state
        .app
        .users
        .list_users(state.page(page.into_inner()))
        .await?;

    Ok(Json(Envelope::ok(
        "Users fetched",
        PageResponse::from_paginated(users),
    )))
}
