//! Pay Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    observability::record_payment_confirmed,
    orders::{OrderResponse, order_error},
    state::State,
};

/// Pay Order Handler
///
/// Settles one of the caller's unpaid orders from their balance.
#[endpoint(
    tags("orders"),
    summary = "Pay Order With Balance",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Insufficient balance"),
        (status_code = StatusCode::CONFLICT, description = "Order already paid"),
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
        .pay_with_balance(principal.user, order.into_inner().into())
        .await
        .map_err(order_error)?;

    record_payment_confirmed("balance");

    Ok(Json(Envelope::ok("Order paid", order.into())))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use topup_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        records::{OrderRecord, OrderUuid, PaymentMethod},
    };

    use crate::test_helpers::{AppMocks, TEST_USER, dec, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        AppMocks {
            orders,
            ..AppMocks::default()
        }
        .customer_service(Router::with_path("orders/{order}/pay").post(handler))
    }

    #[tokio::test]
    async fn test_pay_returns_paid_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_pay_with_balance()
            .once()
            .withf(move |user, order| *user == TEST_USER && *order == uuid)
            .return_once(move |user, _| {
                Ok(OrderRecord {
                    payment_method: PaymentMethod::Balance,
                    is_paid: true,
                    balance_used: dec("23"),
                    balance_snapshot: Some(dec("7")),
                    ..make_order(uuid, user)
                })
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/pay"))
            .send(&make_service(orders))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["isPaid"], true);
        assert_eq!(body["data"]["balance"], 7.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_paying_someone_elses_order_returns_403() {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_pay_with_balance()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/pay"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_paying_twice_returns_409() {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_pay_with_balance()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::AlreadyPaid));

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/pay"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
