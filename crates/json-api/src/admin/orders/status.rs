//! Admin Order Status Handlers
//!
//! `PUT /admin/orders/{order}/status` takes any status in the body; the
//! `complete`, `reject` and `pending` shortcuts set a fixed one. Every change
//! is audited with the acting administrator.

use std::{str::FromStr, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use topup_app::domain::orders::records::OrderStatus;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    orders::{OrderResponse, order_error},
    state::State,
};

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SetStatusRequest {
    /// `pending`, `completed` or `rejected`
    pub status: String,
}

async fn apply(
    depot: &mut Depot,
    order: Uuid,
    status: OrderStatus,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .set_status(order.into(), status, Some(principal.user))
        .await
        .map_err(order_error)?;

    info!(order = %order.uuid, %status, admin = %principal.user, "order status set");

    Ok(Json(Envelope::ok(
        format!("Order marked as {status}"),
        order.into(),
    )))
}

/// Set Order Status Handler
#[endpoint(
    tags("admin"),
    summary = "Set Order Status",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<SetStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    let status = OrderStatus::from_str(json.into_inner().status.trim())
        .map_err(|error| ApiError::unprocessable(error.to_string()))?;

    apply(depot, order.into_inner(), status).await
}

#[endpoint(
    tags("admin"),
    summary = "Complete Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn complete(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    apply(depot, order.into_inner(), OrderStatus::Completed).await
}

#[endpoint(
    tags("admin"),
    summary = "Reject Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn reject(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    apply(depot, order.into_inner(), OrderStatus::Rejected).await
}

#[endpoint(
    tags("admin"),
    summary = "Return Order To Pending",
    security(("bearer_auth" = []))
)]
pub(crate) async fn pending(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, ApiError> {
    apply(depot, order.into_inner(), OrderStatus::Pending).await
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use topup_app::domain::{
        orders::{
            MockOrdersService, OrdersServiceError,
            records::{OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    };

    use crate::test_helpers::{AppMocks, TEST_ADMIN, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        AppMocks {
            orders,
            ..AppMocks::default()
        }
        .admin_service(
            Router::with_path("admin/orders/{order}")
                .push(Router::with_path("status").put(handler))
                .push(Router::with_path("complete").post(complete))
                .push(Router::with_path("reject").post(reject))
                .push(Router::with_path("pending").post(pending)),
        )
    }

    fn expect_status(orders: &mut MockOrdersService, uuid: OrderUuid, status: OrderStatus) {
        orders
            .expect_set_status()
            .once()
            .withf(move |order, to, changed_by| {
                *order == uuid && *to == status && *changed_by == Some(TEST_ADMIN)
            })
            .return_once(move |order, to, _| {
                Ok(OrderRecord {
                    status: to,
                    ..make_order(order, UserUuid::new())
                })
            });
    }

    #[tokio::test]
    async fn test_put_status_sets_parsed_status() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        expect_status(&mut orders, uuid, OrderStatus::Rejected);

        let mut res = TestClient::put(format!("http://example.com/admin/orders/{uuid}/status"))
            .json(&json!({ "status": "rejected" }))
            .send(&make_service(orders))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["message"], "Order marked as rejected");
        assert_eq!(body["data"]["status"], "rejected");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_422() {
        let mut orders = MockOrdersService::new();

        orders.expect_set_status().never();

        let res = TestClient::put(format!(
            "http://example.com/admin/orders/{}/status",
            OrderUuid::new()
        ))
        .json(&json!({ "status": "shipped" }))
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_shortcuts_set_their_status() -> TestResult {
        for (action, status) in [
            ("complete", OrderStatus::Completed),
            ("reject", OrderStatus::Rejected),
            ("pending", OrderStatus::Pending),
        ] {
            let uuid = OrderUuid::new();
            let mut orders = MockOrdersService::new();

            expect_status(&mut orders, uuid, status);

            let mut res =
                TestClient::post(format!("http://example.com/admin/orders/{uuid}/{action}"))
                    .send(&make_service(orders))
                    .await;

            let body: Value = res.take_json().await?;

            assert_eq!(res.status_code, Some(StatusCode::OK), "{action}");
            assert_eq!(body["data"]["status"], status.as_str(), "{action}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_set_status()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::post(format!(
            "http://example.com/admin/orders/{}/complete",
            OrderUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "order not found");

        Ok(())
    }
}
