use clap::Subcommand;
use topup_app::database;

use crate::cli::DatabaseArgs;

#[derive(Debug, Subcommand)]
pub(crate) enum DbCommand {
    /// Apply pending schema migrations
    Migrate {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

impl DbCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self {
            Self::Migrate { database } => {
                database::migrate(&database.pool().await?)
                    .await
                    .map_err(|error| format!("migration failed: {error}"))?;

                println!("schema is up to date");

                Ok(())
            }
        }
    }
}
