//! Admin Update User Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use topup_app::domain::users::{data::UserUpdate, records::UserRole};

use crate::{
    admin::users::UserResponse, envelope::Envelope, errors::ApiError, extensions::*, state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateUserRequest {
    pub name: String,
    pub email: String,

    /// `customer` (or `user`) or `admin`
    pub role: String,
}

/// Replace a user's name, email and role.
#[endpoint(
    tags("admin"),
    summary = "Update User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CONFLICT, description = "Email already in use"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();
    let role = request.role.parse::<UserRole>()?;

    let user = state
        .app
        .users
        .update_user(
            user.into_inner().into(),
            UserUpdate {
                name: request.name,
                email: request.email,
                role,
            },
        )
        .await?;

    info!(user = %user.uuid, %role, admin = %principal.user, "user updated by admin");

    Ok(Json(Envelope::ok("User updated successfully", user.into())))
}
