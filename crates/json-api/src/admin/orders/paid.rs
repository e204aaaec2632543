//! Admin Mark Paid Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    observability::record_payment_confirmed,
    orders::{OrderResponse, order_error},
    state::State,
};

/// Mark an order paid after payment arrived outside the wallet.
///
/// Marking an already paid order is rejected.
#[endpoint(
    tags("admin"),
    summary = "Mark Order Paid",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CONFLICT, description = "Order already paid or not enough stock"),
    ),
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
        .mark_paid(order.into_inner().into())
        .await
        .map_err(order_error)?;

    info!(order = %order.uuid, admin = %principal.user, "order marked paid");
    record_payment_confirmed("manual");

    Ok(Json(Envelope::ok("Order marked as paid", order.into())))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use topup_app::domain::{
        orders::{
            MockOrdersService, OrdersServiceError,
            records::{OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    };

    use crate::test_helpers::{AppMocks, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        AppMocks {
            orders,
            ..AppMocks::default()
        }
        .admin_service(Router::with_path("admin/orders/{order}/paid").post(handler))
    }

    #[tokio::test]
    async fn test_mark_paid_returns_paid_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_mark_paid()
            .once()
            .withf(move |order| *order == uuid)
            .return_once(move |order| {
                Ok(OrderRecord {
                    is_paid: true,
                    paid_at: Some(Timestamp::UNIX_EPOCH),
                    ..make_order(order, UserUuid::new())
                })
            });

        let mut res = TestClient::post(format!("http://example.com/admin/orders/{uuid}/paid"))
            .send(&make_service(orders))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["isPaid"], true);

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_stock_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_mark_paid()
            .once()
            .return_once(|_| Err(OrdersServiceError::InsufficientStock));

        let mut res = TestClient::post(format!(
            "http://example.com/admin/orders/{}/paid",
            OrderUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body["message"], "insufficient stock");

        Ok(())
    }

    #[tokio::test]
    async fn test_already_paid_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_mark_paid()
            .once()
            .return_once(|_| Err(OrdersServiceError::AlreadyPaid));

        let mut res = TestClient::post(format!(
            "http://example.com/admin/orders/{}/paid",
            OrderUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body["message"], "order is already paid");

        Ok(())
    }
}
