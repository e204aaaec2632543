//! Request Balance Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    state::State,
    wallet::{BalanceRequestBody, WalletTransactionResponse, target_user},
};

/// Ask an administrator to top up the wallet, for funds paid outside the store.
///
/// The request stays pending and credits nothing until it is approved.
#[endpoint(
    tags("wallet"),
    summary = "Request Balance",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    json: JsonBody<BalanceRequestBody>,
    depot: &mut Depot,
) -> Result<Json<Envelope<WalletTransactionResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let user = target_user(principal, request.user_id)?;

    let pending = state.app.wallet.request_balance(user, request.amount).await?;

    Ok(Json(Envelope::ok(
        "Balance request submitted",
        pending.into(),
    )))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use topup_app::domain::wallet::{
        MockWalletService, WalletServiceError,
        records::{
            TransactionKind, TransactionMethod, TransactionStatus, WalletTransactionRecord,
            WalletTransactionUuid,
        },
    };

    use crate::test_helpers::{AppMocks, TEST_USER, dec};

    use super::*;

    fn make_service(wallet: MockWalletService) -> Service {
        AppMocks {
            wallet,
            ..AppMocks::default()
        }
        .customer_service(Router::with_path("wallet/balance-requests").post(handler))
    }

    #[tokio::test]
    async fn test_request_is_recorded_as_pending() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_request_balance()
            .once()
            .withf(|user, amount| *user == TEST_USER && *amount == dec("30"))
            .return_once(|user, amount| {
                Ok(WalletTransactionRecord {
                    uuid: WalletTransactionUuid::new(),
                    user,
                    amount,
                    kind: TransactionKind::BalanceRequest,
                    method: TransactionMethod::Manual,
                    external_id: None,
                    status: TransactionStatus::Pending,
                    order: None,
                    payer_email: None,
                    capture_id: None,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/wallet/balance-requests")
            .json(&json!({ "amount": 30 }))
            .send(&make_service(wallet))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["kind"], "balance_request");
        assert_eq!(body["data"]["method"], "manual");
        assert_eq!(body["data"]["status"], "pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_user_id_returns_403() {
        let mut wallet = MockWalletService::new();

        wallet.expect_request_balance().never();

        let res = TestClient::post("http://example.com/wallet/balance-requests")
            .json(&json!({ "amount": 30, "userId": uuid::Uuid::now_v7() }))
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_invalid_amount_returns_422() {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_request_balance()
            .once()
            .return_once(|_, _| Err(WalletServiceError::InvalidAmount));

        let res = TestClient::post("http://example.com/wallet/balance-requests")
            .json(&json!({ "amount": -1 }))
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
