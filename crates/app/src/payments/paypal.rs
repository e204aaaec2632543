//! PayPal Orders v2 client.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use jiff::{SignedDuration, Timestamp};
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    money::round2,
    payments::{GatewayCapture, GatewayOrder, PaymentGateway, PaymentGatewayError},
};

/// Seconds shaved off a token's lifetime so it is refreshed before PayPal expires it.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Configuration for connecting to PayPal.
#[derive(Clone)]
pub struct PayPalConfig {
    /// API base, e.g. `"https://api-m.sandbox.paypal.com"`.
    pub api_url: String,

    pub client_id: String,

    pub app_secret: String,

    /// ISO 4217 code charges are created in.
    pub currency: String,
}

impl fmt::Debug for PayPalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalConfig")
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("app_secret", &"**redacted**")
            .field("currency", &self.currency)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Timestamp,
}

/// HTTP client for the PayPal checkout API.
#[derive(Debug, Clone)]
pub struct PayPalClient {
    config: PayPalConfig,
    http: Client,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl PayPalClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Return a cached OAuth token, fetching a new one when it is missing or stale.
    async fn access_token(&self) -> Result<String, PaymentGatewayError> {
        {
            let cached = self.token.read().await;

            if let Some(token) = cached.as_ref()
                && token.expires_at > Timestamp::now()
            {
                return Ok(token.value.clone());
            }
        }

        let credentials = BASE64.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.app_secret
        ));

        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.config.api_url))
            .header("Authorization", format!("Basic {credentials}"))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let parsed: TokenResponse = ensure_success(response, "token").await?.json().await?;

        let lifetime = parsed
            .expires_in
            .unwrap_or(3600)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);

        let expires_at = Timestamp::now()
            .checked_add(SignedDuration::from_secs(lifetime))
            .unwrap_or_else(|_| Timestamp::now());

        debug!("refreshed paypal access token");

        *self.token.write().await = Some(CachedToken {
            value: parsed.access_token.clone(),
            expires_at,
        });

        Ok(parsed.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PayPalClient {
    async fn create_order(&self, amount: Decimal) -> Result<GatewayOrder, PaymentGatewayError> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": self.config.currency,
                    "value": format!("{:.2}", round2(amount)),
                },
            }],
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.config.api_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let parsed: CreateOrderResponse =
            ensure_success(response, "create order").await?.json().await?;

        Ok(GatewayOrder {
            id: parsed.id,
            status: parsed.status,
        })
    }

    async fn capture_order(&self, order_id: &str) -> Result<GatewayCapture, PaymentGatewayError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{order_id}/capture",
                self.config.api_url
            ))
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await?;

        let parsed: CaptureResponse = ensure_success(response, "capture order")
            .await?
            .json()
            .await?;

        Ok(parsed.into())
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response, PaymentGatewayError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    debug!(%status, action, "paypal request failed");

    Err(PaymentGatewayError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
    id: String,
    status: String,
    payer: Option<Payer>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct Payer {
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
    id: String,
}

impl From<CaptureResponse> for GatewayCapture {
    fn from(response: CaptureResponse) -> Self {
        let capture_id = response
            .purchase_units
            .into_iter()
            .next()
            .and_then(|unit| unit.payments)
            .and_then(|payments| payments.captures.into_iter().next())
            .map(|capture| capture.id);

        Self {
            order_id: response.id,
            status: response.status,
            payer_email: response.payer.and_then(|payer| payer.email_address),
            capture_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_response_extracts_payer_and_capture_id() -> Result<(), serde_json::Error> {
        let body = r#"{
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "payer": { "email_address": "buyer@example.com", "payer_id": "QYR5Z8XDVJNXQ" },
            "purchase_units": [{
                "reference_id": "default",
                "payments": { "captures": [{ "id": "3C679366HH908993F", "status": "COMPLETED" }] }
            }]
        }"#;

        let capture: GatewayCapture = serde_json::from_str::<CaptureResponse>(body)?.into();

        assert!(capture.is_completed());
        assert_eq!(capture.order_id, "5O190127TN364715T");
        assert_eq!(capture.payer_email.as_deref(), Some("buyer@example.com"));
        assert_eq!(capture.capture_id.as_deref(), Some("3C679366HH908993F"));

        Ok(())
    }

    #[test]
    fn capture_response_tolerates_missing_details() -> Result<(), serde_json::Error> {
        let body = r#"{ "id": "ORDER-1", "status": "PAYER_ACTION_REQUIRED" }"#;

        let capture: GatewayCapture = serde_json::from_str::<CaptureResponse>(body)?.into();

        assert!(!capture.is_completed());
        assert!(capture.payer_email.is_none());
        assert!(capture.capture_id.is_none());

        Ok(())
    }

    #[test]
    fn config_debug_redacts_secret() {
        let config = PayPalConfig {
            api_url: "https://api-m.sandbox.paypal.com".to_string(),
            client_id: "client".to_string(),
            app_secret: "super-secret".to_string(),
            currency: "USD".to_string(),
        };

        let rendered = format!("{config:?}");

        assert!(!rendered.contains("super-secret"), "secret leaked: {rendered}");
    }
}
