//! Admin Get User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    admin::users::UserResponse, envelope::Envelope, errors::ApiError, extensions::*, state::State,
};

#[endpoint(
    tags("admin"),
    summary = "Get User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state.app.users.get_user(user.into_inner().into()).await?;

    Ok(Json(Envelope::ok("User fetched", user.into())))
}
