//! Admin Order History Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    orders::{OrderStatusChangeResponse, order_error},
    state::State,
};

/// Status changes of one order, oldest first.
#[endpoint(
    tags("admin"),
    summary = "Order Status History",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<Vec<OrderStatusChangeResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let changes = state
        .app
        .orders
        .list_status_changes(order.into_inner().into())
        .await
        .map_err(order_error)?;

    Ok(Json(Envelope::ok(
        "Status history fetched",
        changes.into_iter().map(Into::into).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use topup_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        records::{OrderStatus, OrderStatusChangeRecord, OrderStatusChangeUuid, OrderUuid},
    };

    use crate::test_helpers::{AppMocks, TEST_ADMIN};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        AppMocks {
            orders,
            ..AppMocks::default()
        }
        .admin_service(Router::with_path("admin/orders/{order}/history").get(handler))
    }

    #[tokio::test]
    async fn test_history_lists_transitions_with_actor() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_status_changes()
            .once()
            .withf(move |order| *order == uuid)
            .return_once(move |order| {
                Ok(vec![
                    OrderStatusChangeRecord {
                        uuid: OrderStatusChangeUuid::new(),
                        order,
                        from: OrderStatus::Pending,
                        to: OrderStatus::Rejected,
                        changed_by: Some(TEST_ADMIN),
                        created_at: Timestamp::UNIX_EPOCH,
                    },
                    OrderStatusChangeRecord {
                        uuid: OrderStatusChangeUuid::new(),
                        order,
                        from: OrderStatus::Rejected,
                        to: OrderStatus::Pending,
                        changed_by: None,
                        created_at: Timestamp::UNIX_EPOCH,
                    },
                ])
            });

        let mut res = TestClient::get(format!("http://example.com/admin/orders/{uuid}/history"))
            .send(&make_service(orders))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"][0]["from"], "pending");
        assert_eq!(body["data"][0]["to"], "rejected");
        assert_eq!(
            body["data"][0]["changedBy"],
            TEST_ADMIN.into_uuid().to_string()
        );
        assert_eq!(body["data"][1]["changedBy"], Value::Null);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order_returns_404() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_status_changes()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/admin/orders/{}/history",
            OrderUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
