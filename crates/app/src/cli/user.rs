use clap::Subcommand;
use rust_decimal::Decimal;
use topup_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{UserRole, UserUuid},
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Subcommand)]
pub(crate) enum UserCommand {
    /// Create a customer or administrator
    Create {
        #[command(flatten)]
        database: DatabaseArgs,

        /// Display name
        #[arg(long)]
        name: String,

        /// Login email, unique case-insensitively
        #[arg(long)]
        email: String,

        /// `customer` or `admin`
        #[arg(long, default_value = "customer")]
        role: UserRole,

        /// Opening balance, recorded as an admin credit
        #[arg(long, default_value_t = Decimal::ZERO)]
        balance: Decimal,
    },
}

impl UserCommand {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self {
            Self::Create {
                database,
                name,
                email,
                role,
                balance,
            } => {
                let user = PgUsersService::new(database.db().await?)
                    .create_user(NewUser {
                        uuid: UserUuid::new(),
                        name,
                        email,
                        role,
                        balance,
                    })
                    .await
                    .map_err(|error| format!("could not create user: {error}"))?;

                println!("user: {}", user.uuid);
                println!("email: {}", user.email);
                println!("role: {}", user.role);
                println!("balance: {}", user.balance);

                Ok(())
            }
        }
    }
}
