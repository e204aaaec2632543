//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
        wallet::{PgWalletService, WalletService},
    },
    payments::{PayPalClient, PayPalConfig},
    receipts::LogReceiptSender,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Everything needed to wire the services together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,

    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub paypal: PayPalConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub wallet: Arc<dyn WalletService>,
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
    pub auth: Arc<dyn AuthService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url, config.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        if config.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let db = Db::new(pool.clone());
        let gateway = Arc::new(PayPalClient::new(config.paypal));

        Ok(Self {
            orders: Arc::new(PgOrdersService::new(db.clone(), Arc::new(LogReceiptSender))),
            wallet: Arc::new(PgWalletService::new(db.clone(), gateway)),
            users: Arc::new(PgUsersService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
