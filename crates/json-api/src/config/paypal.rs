//! PayPal Config

use std::fmt;

use clap::Args;

use topup_app::payments::PayPalConfig;

/// PayPal REST credentials.
#[derive(Args)]
pub struct PayPalSettings {
    /// PayPal API base URL
    #[arg(
        long,
        env = "PAYPAL_API_URL",
        default_value = "https://api-m.sandbox.paypal.com"
    )]
    pub paypal_api_url: String,

    /// PayPal REST client id
    #[arg(long, env = "PAYPAL_CLIENT_ID")]
    pub paypal_client_id: String,

    /// PayPal REST app secret
    #[arg(long, env = "PAYPAL_APP_SECRET", hide_env_values = true)]
    pub paypal_app_secret: String,

    /// Currency deposits are charged in
    #[arg(long, env = "PAYPAL_CURRENCY", default_value = "USD")]
    pub paypal_currency: String,
}

impl PayPalSettings {
    pub(crate) fn to_paypal_config(&self) -> PayPalConfig {
        PayPalConfig {
            api_url: self.paypal_api_url.clone(),
            client_id: self.paypal_client_id.clone(),
            app_secret: self.paypal_app_secret.clone(),
            currency: self.paypal_currency.clone(),
        }
    }
}

impl fmt::Debug for PayPalSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalSettings")
            .field("paypal_api_url", &self.paypal_api_url)
            .field("paypal_client_id", &self.paypal_client_id)
            .field("paypal_app_secret", &"**redacted**")
            .field("paypal_currency", &self.paypal_currency)
            .finish()
    }
}
