//! Admin Balance Requests Index Handler

use std::{str::FromStr, sync::Arc};

use salvo::{oapi::extract::QueryParam, prelude::*};

use topup_app::domain::wallet::records::TransactionStatus;

use crate::{
    envelope::{Envelope, PageResponse},
    errors::ApiError,
    extensions::*,
    state::State,
    wallet::WalletTransactionResponse,
};

/// List balance requests in one status (`pending` unless given), newest first.
#[endpoint(
    tags("admin"),
    summary = "List Balance Requests",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PageResponse<WalletTransactionResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = match status.into_inner() {
        Some(status) => TransactionStatus::from_str(status.trim())
            .map_err(|error| ApiError::unprocessable(error.to_string()))?,
        None => TransactionStatus::Pending,
    };

    let requests = state
        .app
        .wallet
        .list_balance_requests(status, state.page(page.into_inner()))
        .await?;

    Ok(Json(Envelope::ok(
        "Balance requests fetched",
        PageResponse::from_paginated(requests),
    )))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use topup_app::{
        domain::wallet::{
            MockWalletService,
            records::{
                TransactionKind, TransactionMethod, WalletTransactionRecord, WalletTransactionUuid,
            },
        },
        pagination::Paginated,
    };

    use crate::test_helpers::{AppMocks, TEST_PAGE_SIZE, TEST_USER, dec};

    use super::*;

    fn make_service(wallet: MockWalletService) -> Service {
        AppMocks {
            wallet,
            ..AppMocks::default()
        }
        .admin_service(Router::with_path("admin/balance-requests").get(handler))
    }

    fn make_request(status: TransactionStatus) -> WalletTransactionRecord {
        WalletTransactionRecord {
            uuid: WalletTransactionUuid::new(),
            user: TEST_USER,
            amount: dec("30"),
            kind: TransactionKind::BalanceRequest,
            method: TransactionMethod::Manual,
            external_id: None,
            status,
            order: None,
            payer_email: None,
            capture_id: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_pending_requests_are_the_default() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_list_balance_requests()
            .once()
            .withf(|status, page| {
                *status == TransactionStatus::Pending
                    && page.number == 1
                    && page.size == TEST_PAGE_SIZE
            })
            .return_once(|status, page| {
                Ok(Paginated {
                    items: vec![make_request(status)],
                    total: 1,
                    page,
                })
            });

        let mut res = TestClient::get("http://example.com/admin/balance-requests")
            .send(&make_service(wallet))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["items"][0]["status"], "pending");
        assert_eq!(body["data"]["items"][0]["amount"], 30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_status_filter_is_passed_through() {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_list_balance_requests()
            .once()
            .withf(|status, page| *status == TransactionStatus::Completed && page.number == 2)
            .return_once(|_, page| {
                Ok(Paginated {
                    items: Vec::new(),
                    total: 0,
                    page,
                })
            });

        let res = TestClient::get("http://example.com/admin/balance-requests?status=completed&page=2")
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_unknown_status_returns_422() {
        let mut wallet = MockWalletService::new();

        wallet.expect_list_balance_requests().never();

        let res = TestClient::get("http://example.com/admin/balance-requests?status=refunded")
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
