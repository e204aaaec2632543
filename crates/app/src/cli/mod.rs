//! `topup-app` subcommands. Each one opens its own small pool, does one
//! thing and prints the result as `key: value` lines.

use clap::{Args, Parser, Subcommand};
use sqlx::PgPool;
use topup_app::database::{self, Db};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "topup-app", about = "Top-up storefront admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage storefront accounts
    #[command(subcommand)]
    User(user::UserCommand),

    /// Issue and revoke API bearer tokens
    #[command(subcommand)]
    Token(token::TokenCommand),

    /// Schema maintenance
    #[command(subcommand)]
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => command.run().await,
            Commands::Token(command) => command.run().await,
            Commands::Db(command) => command.run().await,
        }
    }
}

/// Connection settings shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn pool(&self) -> Result<PgPool, String> {
        database::connect(&self.database_url, 2)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }

    pub(crate) async fn db(&self) -> Result<Db, String> {
        self.pool().await.map(Db::new)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn token_create_parses_user_and_expiry() {
        let parsed = Cli::try_parse_from([
            "topup-app",
            "token",
            "create",
            "--database-url",
            "postgres://localhost/topup",
            "--user",
            "0190d9e6-86ae-7c5d-b9a3-6f2a8b6f4c11",
            "--expires-at",
            "2030-01-01T00:00:00Z",
        ]);

        assert!(parsed.is_ok(), "{parsed:?}");
    }

    #[test]
    fn user_create_rejects_unknown_role() {
        let parsed = Cli::try_parse_from([
            "topup-app",
            "user",
            "create",
            "--database-url",
            "postgres://localhost/topup",
            "--name",
            "Ops",
            "--email",
            "ops@example.com",
            "--role",
            "root",
        ]);

        assert!(parsed.is_err(), "unknown role should not parse");
    }
}
