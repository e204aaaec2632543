//! Wallet request and response bodies.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use topup_app::domain::wallet::records::{WalletRecord, WalletTransactionRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WalletTransactionResponse {
    pub id: Uuid,
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,

    /// `order_debit`, `paypal_deposit`, `admin_credit` or `balance_request`
    pub kind: String,
    pub method: String,
    pub status: String,
    pub external_id: Option<String>,
    pub order_id: Option<Uuid>,
    pub payer_email: Option<String>,
    pub capture_id: Option<String>,
    pub created_at: String,
}

impl From<WalletTransactionRecord> for WalletTransactionResponse {
    fn from(transaction: WalletTransactionRecord) -> Self {
        Self {
            id: transaction.uuid.into_uuid(),
            amount: transaction.amount,
            kind: transaction.kind.to_string(),
            method: transaction.method.to_string(),
            status: transaction.status.to_string(),
            external_id: transaction.external_id,
            order_id: transaction.order.map(Into::into),
            payer_email: transaction.payer_email,
            capture_id: transaction.capture_id,
            created_at: transaction.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WalletResponse {
    #[salvo(schema(value_type = f64))]
    pub balance: Decimal,

    /// Newest first
    pub transactions: Vec<WalletTransactionResponse>,
}

impl From<WalletRecord> for WalletResponse {
    fn from(wallet: WalletRecord) -> Self {
        Self {
            balance: wallet.balance,
            transactions: wallet.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

/// `POST /wallet/balance-requests`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BalanceRequestBody {
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// `POST /wallet/paypal/create-order`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePayPalOrderRequest {
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PayPalOrderCreatedResponse {
    pub success: bool,

    /// Gateway order id to approve on the client
    #[serde(rename = "orderID")]
    pub order_id: String,
}

/// `POST /wallet/paypal/capture-order`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CapturePayPalOrderRequest {
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PayPalCaptureResponse {
    pub success: bool,
    #[salvo(schema(value_type = f64))]
    pub new_balance: Decimal,
}
