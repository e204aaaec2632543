//! Server configuration module

use clap::Parser;

use topup_app::context::AppConfig;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    pagination::PaginationConfig,
    paypal::PayPalSettings,
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod pagination;
pub(crate) mod paypal;
pub(crate) mod server;

pub(crate) use observability::LogFormat;

/// Top-up JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "topup-json", about = "Top-up storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// List endpoint settings.
    #[command(flatten)]
    pub pagination: PaginationConfig,

    /// PayPal checkout settings.
    #[command(flatten)]
    pub paypal: PayPalSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings handed to the application context.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            max_connections: self.database.database_max_connections,
            run_migrations: self.database.run_migrations,
            paypal: self.paypal.to_paypal_config(),
        }
    }
}
