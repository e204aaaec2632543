//! Create Order Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    observability::{record_order_created, record_payment_confirmed},
    orders::{CreateOrderRequest, OrderCreatedResponse},
    state::State,
};

/// Create Order Handler
///
/// Balance orders are paid immediately. Other payment methods leave the
/// order unpaid until an administrator confirms the payment.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Insufficient balance"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<OrderCreatedResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let new_order = json.into_inner().into_new_order()?;

    let order = state
        .app
        .orders
        .create_order(principal.user, new_order)
        .await?;

    record_order_created(order.payment_method.as_str());

    if order.is_paid {
        record_payment_confirmed("balance");
    }

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(Envelope::ok(
        "Order placed",
        OrderCreatedResponse {
            order_id: order.uuid.into_uuid(),
        },
    )))
}
