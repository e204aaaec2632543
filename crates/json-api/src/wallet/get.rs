//! Get Wallet Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::Envelope, errors::ApiError, extensions::*, state::State, wallet::WalletResponse,
};

/// Get Wallet Handler
///
/// Returns the caller's balance and ledger.
#[endpoint(
    tags("wallet"),
    summary = "Get Wallet",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Envelope<WalletResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let wallet = state.app.wallet.get_wallet(principal.user).await?;

    Ok(Json(Envelope::ok("Wallet fetched", wallet.into())))
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
            TransactionKind, TransactionMethod, TransactionStatus, WalletRecord,
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
        .customer_service(Router::with_path("wallet").get(handler))
    }

    #[tokio::test]
    async fn test_returns_balance_and_ledger() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_get_wallet()
            .once()
            .withf(|user| *user == TEST_USER)
            .return_once(|user| {
                Ok(WalletRecord {
                    user,
                    balance: dec("20.00"),
                    transactions: vec![WalletTransactionRecord {
                        uuid: WalletTransactionUuid::new(),
                        user,
                        amount: dec("20.00"),
                        kind: TransactionKind::PaypalDeposit,
                        method: TransactionMethod::Paypal,
                        external_id: Some("5O190127TN364715T".to_owned()),
                        status: TransactionStatus::Completed,
                        order: None,
                        payer_email: Some("buyer@example.com".to_owned()),
                        capture_id: Some("3C679366HH908993F".to_owned()),
                        created_at: Timestamp::UNIX_EPOCH,
                        updated_at: Timestamp::UNIX_EPOCH,
                    }],
                })
            });

        let mut res = TestClient::get("http://example.com/wallet")
            .send(&make_service(wallet))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["balance"], 20.0);
        assert_eq!(body["data"]["transactions"][0]["kind"], "paypal_deposit");
        assert_eq!(body["data"]["transactions"][0]["status"], "completed");

        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_user_returns_404() {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_get_wallet()
            .once()
            .return_once(|_| Err(WalletServiceError::UserNotFound));

        let res = TestClient::get("http://example.com/wallet")
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
