//! Wallet

pub(crate) mod get;
mod models;
pub(crate) mod paypal;
pub(crate) mod request;

pub(crate) use models::*;

use tracing::warn;
use uuid::Uuid;

use topup_app::{auth::Principal, domain::users::records::UserUuid};

use crate::errors::ApiError;

/// The wallet a request acts on. Clients may name it with `userId`, which
/// must be their own unless they are an administrator.
pub(crate) fn target_user(principal: Principal, user_id: Option<Uuid>) -> Result<UserUuid, ApiError> {
    let Some(user_id) = user_id.map(UserUuid::from_uuid) else {
        return Ok(principal.user);
    };

    if user_id == principal.user || principal.is_admin() {
        return Ok(user_id);
    }

    warn!(user = %principal.user, target = %user_id, "wallet access denied");

    Err(ApiError::forbidden("userId does not match the signed-in user"))
}
