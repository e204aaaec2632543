//! Admin Balance Request Review Handlers
//!
//! Approving credits the requested amount and completes the request in one
//! transaction. Either decision is final.

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    admin::users::credit::CreditResponse, envelope::Envelope, errors::ApiError, extensions::*,
    state::State, wallet::WalletTransactionResponse,
};

/// Approve Balance Request Handler
#[endpoint(
    tags("admin"),
    summary = "Approve Balance Request",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CONFLICT, description = "Request already approved or rejected"),
    ),
)]
pub(crate) async fn approve(
    request: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<CreditResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = request.into_inner();

    let approved = state
        .app
        .wallet
        .approve_balance_request(request.into())
        .await?;

    info!(%request, admin = %principal.user, "balance request approved by admin");

    Ok(Json(Envelope::ok(
        "Balance request approved",
        CreditResponse {
            new_balance: approved.new_balance,
            transaction_id: approved.transaction.uuid.into_uuid(),
        },
    )))
}

/// Reject Balance Request Handler
#[endpoint(
    tags("admin"),
    summary = "Reject Balance Request",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CONFLICT, description = "Request already approved or rejected"),
    ),
)]
pub(crate) async fn reject(
    request: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<WalletTransactionResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = request.into_inner();

    let rejected = state
        .app
        .wallet
        .reject_balance_request(request.into())
        .await?;

    info!(%request, admin = %principal.user, "balance request rejected by admin");

    Ok(Json(Envelope::ok(
        "Balance request rejected",
        rejected.into(),
    )))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use topup_app::domain::wallet::{
        MockWalletService, WalletServiceError,
        records::{
            CreditedBalance, TransactionKind, TransactionMethod, TransactionStatus,
            WalletTransactionRecord, WalletTransactionUuid,
        },
    };

    use crate::test_helpers::{AppMocks, TEST_USER, dec};

    use super::*;

    fn make_service(wallet: MockWalletService) -> Service {
        AppMocks {
            wallet,
            ..AppMocks::default()
        }
        .admin_service(
            Router::with_path("admin/balance-requests/{request}")
                .push(Router::with_path("approve").post(approve))
                .push(Router::with_path("reject").post(reject)),
        )
    }

    fn make_request(
        uuid: WalletTransactionUuid,
        status: TransactionStatus,
    ) -> WalletTransactionRecord {
        WalletTransactionRecord {
            uuid,
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
    async fn test_approve_returns_new_balance() -> TestResult {
        let uuid = WalletTransactionUuid::new();
        let mut wallet = MockWalletService::new();

        wallet
            .expect_approve_balance_request()
            .once()
            .withf(move |request| *request == uuid)
            .return_once(move |request| {
                Ok(CreditedBalance {
                    new_balance: dec("70"),
                    transaction: make_request(request, TransactionStatus::Completed),
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/admin/balance-requests/{uuid}/approve"
        ))
        .send(&make_service(wallet))
        .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["newBalance"], 70.0);
        assert_eq!(body["data"]["transactionId"], uuid.into_uuid().to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_approving_reviewed_request_returns_409() {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_approve_balance_request()
            .once()
            .return_once(|_| Err(WalletServiceError::AlreadyReviewed));

        let res = TestClient::post(format!(
            "http://example.com/admin/balance-requests/{}/approve",
            WalletTransactionUuid::new()
        ))
        .send(&make_service(wallet))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_unknown_request_returns_404() {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_approve_balance_request()
            .once()
            .return_once(|_| Err(WalletServiceError::TransactionNotFound));

        let res = TestClient::post(format!(
            "http://example.com/admin/balance-requests/{}/approve",
            WalletTransactionUuid::new()
        ))
        .send(&make_service(wallet))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_reject_returns_rejected_request() -> TestResult {
        let uuid = WalletTransactionUuid::new();
        let mut wallet = MockWalletService::new();

        wallet.expect_approve_balance_request().never();
        wallet
            .expect_reject_balance_request()
            .once()
            .withf(move |request| *request == uuid)
            .return_once(|request| {
                Ok(make_request(request, TransactionStatus::Rejected))
            });

        let mut res = TestClient::post(format!(
            "http://example.com/admin/balance-requests/{uuid}/reject"
        ))
        .send(&make_service(wallet))
        .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["status"], "rejected");

        Ok(())
    }
}
