//! Users service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        users::{
            data::{NewUser, UserUpdate},
            errors::UsersServiceError,
            records::{UserRecord, UserUuid},
            repository::PgUsersRepository,
        },
        wallet::{
            PgWalletRepository,
            data::NewWalletTransaction,
            records::{TransactionKind, TransactionMethod, TransactionStatus},
        },
    },
    money::round2,
    pagination::{Page, Paginated},
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    wallet: PgWalletRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
            wallet: PgWalletRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        validate_new_user(&user)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_user(&mut tx, &user).await?;

        // An opening balance is a credit like any other and gets its ledger row.
        if created.balance > Decimal::ZERO {
            self.wallet
                .insert_transaction(
                    &mut tx,
                    &NewWalletTransaction::completed(
                        created.uuid,
                        created.balance,
                        TransactionKind::AdminCredit,
                        TransactionMethod::Admin,
                    ),
                )
                .await?;
        }

        tx.commit().await?;

        info!(user = %created.uuid, role = %created.role, "user created");

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_users(&self, page: Page) -> Result<Paginated<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let items = self.repository.list_users(&mut tx, page).await?;
        let total = self.repository.count_users(&mut tx).await?;

        tx.commit().await?;

        Ok(Paginated { items, total, page })
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        validate_contact(&update.name, &update.email)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_user(&mut tx, user, &update).await?;

        tx.commit().await?;

        info!(user = %updated.uuid, role = %updated.role, "user updated");

        Ok(updated)
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_user(&mut tx, user).await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(%user, "user deleted");

        Ok(())
    }
}

fn validate_contact(name: &str, email: &str) -> Result<(), UsersServiceError> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(UsersServiceError::MissingRequiredData);
    }

    if !email.contains('@') {
        return Err(UsersServiceError::InvalidData);
    }

    Ok(())
}

fn validate_new_user(user: &NewUser) -> Result<(), UsersServiceError> {
    validate_contact(&user.name, &user.email)?;

    if user.balance < Decimal::ZERO || round2(user.balance) != user.balance {
        return Err(UsersServiceError::InvalidData);
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a user, recording any opening balance in the ledger.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Lists users, newest first.
    async fn list_users(&self, page: Page) -> Result<Paginated<UserRecord>, UsersServiceError>;

    /// Replaces a user's name, email and role. The balance is left alone.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Deletes a user. Their orders are kept with no owner.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;
}
