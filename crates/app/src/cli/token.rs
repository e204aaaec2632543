use clap::Subcommand;
use jiff::Timestamp;
use topup_app::{auth::PgAuthService, domain::users::records::UserUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Subcommand)]
pub(crate) enum TokenCommand {
    /// Issue a bearer token for a user. The token is printed once.
    Create {
        #[command(flatten)]
        database: DatabaseArgs,

        #[arg(long)]
        user: UserUuid,

        /// RFC 3339 expiry; tokens never expire without it
        #[arg(long)]
        expires_at: Option<Timestamp>,
    },

    /// Show a user's tokens, newest first
    List {
        #[command(flatten)]
        database: DatabaseArgs,

        #[arg(long)]
        user: UserUuid,
    },

    /// Revoke a token by its id
    Revoke {
        #[command(flatten)]
        database: DatabaseArgs,

        #[arg(long)]
        token: Uuid,
    },
}

fn show(value: Option<Timestamp>, absent: &str) -> String {
    value.map_or_else(|| absent.to_owned(), |value| value.to_string())
}

impl TokenCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self {
            Self::Create {
                database,
                user,
                expires_at,
            } => {
                if expires_at.is_some_and(|expires_at| expires_at <= Timestamp::now()) {
                    return Err("--expires-at must be in the future".to_owned());
                }

                let issued = PgAuthService::new(database.pool().await?)
                    .issue_api_token(user, expires_at)
                    .await
                    .map_err(|error| format!("could not issue token: {error}"))?;

                println!("token: {}", issued.metadata.uuid);
                println!("user: {}", issued.metadata.user);
                println!("expires: {}", show(issued.metadata.expires_at, "never"));
                println!();
                println!("{}", issued.token);

                Ok(())
            }
            Self::List { database, user } => {
                let tokens = PgAuthService::new(database.pool().await?)
                    .list_api_tokens(user)
                    .await
                    .map_err(|error| format!("could not list tokens: {error}"))?;

                if tokens.is_empty() {
                    println!("{user} has no tokens");
                }

                for token in tokens {
                    println!(
                        "{}  created {}  last used {}  expires {}  revoked {}",
                        token.uuid,
                        token.created_at,
                        show(token.last_used_at, "never"),
                        show(token.expires_at, "never"),
                        show(token.revoked_at, "no"),
                    );
                }

                Ok(())
            }
            Self::Revoke { database, token } => {
                let revoked = PgAuthService::new(database.pool().await?)
                    .revoke_api_token(token)
                    .await
                    .map_err(|error| format!("could not revoke token: {error}"))?;

                if revoked {
                    println!("{token} revoked");
                } else {
                    println!("{token} was already inactive");
                }

                Ok(())
            }
        }
    }
}
