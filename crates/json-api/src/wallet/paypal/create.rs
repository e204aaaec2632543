//! Create PayPal Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    errors::ApiError,
    extensions::*,
    state::State,
    wallet::{CreatePayPalOrderRequest, PayPalOrderCreatedResponse, target_user},
};

/// Create PayPal Order Handler
///
/// Opens a PayPal order for a wallet deposit and records it as pending.
#[endpoint(
    tags("wallet"),
    summary = "Start PayPal Deposit",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_GATEWAY, description = "PayPal rejected the request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePayPalOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<PayPalOrderCreatedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let user = target_user(principal, request.user_id)?;

    let deposit = state
        .app
        .wallet
        .create_paypal_deposit(user, request.amount)
        .await?;

    let Some(order_id) = deposit.external_id else {
        return Err(ApiError::internal());
    };

    Ok(Json(PayPalOrderCreatedResponse {
        success: true,
        order_id,
    }))
}
