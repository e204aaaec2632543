//! Capture PayPal Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::warn;

use topup_app::errors::{ClassifiedError, ErrorClass};

use crate::{
    errors::ApiError,
    extensions::*,
    observability::record_paypal_capture,
    state::State,
    wallet::{CapturePayPalOrderRequest, PayPalCaptureResponse, target_user},
};

/// Capture PayPal Order Handler
///
/// Captures an approved deposit and credits the wallet exactly once.
#[endpoint(
    tags("wallet"),
    summary = "Capture PayPal Deposit",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CONFLICT, description = "Deposit already captured"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Capture failed or was not completed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CapturePayPalOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<PayPalCaptureResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let user = target_user(principal, request.user_id)?;

    match state
        .app
        .wallet
        .capture_paypal_deposit(user, &request.order_id, request.amount)
        .await
    {
        Ok(captured) => {
            record_paypal_capture("completed");

            Ok(Json(PayPalCaptureResponse {
                success: true,
                new_balance: captured.new_balance,
            }))
        }
        Err(error) => {
            let outcome = match error.class() {
                ErrorClass::Conflict => "duplicate",
                ErrorClass::ExternalPayment => "failed",
                _ => "rejected",
            };

            record_paypal_capture(outcome);
            warn!(%user, order_id = %request.order_id, %error, "paypal capture not applied");

            Err(error.into())
        }
    }
}
