//! Wallet service.
//!
//! PayPal deposits are two-phase: `create_paypal_deposit` records a pending
//! ledger row keyed by the gateway order id, and `capture_paypal_deposit`
//! flips that row to completed and credits the balance exactly once.
//!
//! Balance requests follow the same shape without a gateway: the customer
//! records a pending `balance_request` row and an admin approves or rejects it.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        users::records::UserUuid,
        wallet::{
            data::NewWalletTransaction,
            errors::WalletServiceError,
            records::{
                CapturedDeposit, CreditedBalance, TransactionKind, TransactionMethod,
                TransactionStatus, WalletRecord, WalletTransactionRecord, WalletTransactionUuid,
            },
            repository::PgWalletRepository,
        },
    },
    money::{MAX_AMOUNT, is_positive_amount},
    pagination::{Page, Paginated},
    payments::PaymentGateway,
};

#[derive(Clone)]
pub struct PgWalletService {
    db: Db,
    repository: PgWalletRepository,
    gateway: Arc<dyn PaymentGateway>,
}

impl std::fmt::Debug for PgWalletService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgWalletService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgWalletService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            db,
            repository: PgWalletRepository::new(),
            gateway,
        }
    }

    /// Lock a balance request row, failing unless it is still pending.
    async fn lock_pending_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: WalletTransactionUuid,
    ) -> Result<WalletTransactionRecord, WalletServiceError> {
        let locked = self
            .repository
            .lock_transaction(tx, request)
            .await?
            .filter(|row| row.kind == TransactionKind::BalanceRequest)
            .ok_or(WalletServiceError::TransactionNotFound)?;

        if locked.status != TransactionStatus::Pending {
            warn!(%request, status = %locked.status, "balance request already reviewed");

            return Err(WalletServiceError::AlreadyReviewed);
        }

        Ok(locked)
    }
}

#[async_trait]
impl WalletService for PgWalletService {
    async fn get_wallet(&self, user: UserUuid) -> Result<WalletRecord, WalletServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let balance = self
            .repository
            .get_balance(&mut tx, user)
            .await?
            .ok_or(WalletServiceError::UserNotFound)?;

        let transactions = self.repository.list_transactions(&mut tx, user).await?;

        tx.commit().await?;

        Ok(WalletRecord {
            user,
            balance,
            transactions,
        })
    }

    async fn create_paypal_deposit(
        &self,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<WalletTransactionRecord, WalletServiceError> {
        if !is_positive_amount(amount) {
            return Err(WalletServiceError::InvalidAmount);
        }

        let mut tx = self.db.begin_transaction().await?;

        if self.repository.get_balance(&mut tx, user).await?.is_none() {
            return Err(WalletServiceError::UserNotFound);
        }

        tx.commit().await?;

        let order = self.gateway.create_order(amount).await?;

        let mut tx = self.db.begin_transaction().await?;

        let pending = self
            .repository
            .insert_transaction(
                &mut tx,
                &NewWalletTransaction::pending_paypal_deposit(user, amount, order.id),
            )
            .await?;

        tx.commit().await?;

        info!(
            %user,
            external_id = pending.external_id.as_deref().unwrap_or_default(),
            %amount,
            "paypal deposit created"
        );

        Ok(pending)
    }

    async fn capture_paypal_deposit(
        &self,
        user: UserUuid,
        external_id: &str,
        amount: Decimal,
    ) -> Result<CapturedDeposit, WalletServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        // Holding the row lock across the gateway call serialises captures of
        // the same deposit; the loser sees a completed row.
        let pending = self
            .repository
            .lock_transaction_by_external_id(&mut tx, user, TransactionMethod::Paypal, external_id)
            .await?
            .ok_or(WalletServiceError::TransactionNotFound)?;

        if pending.status == TransactionStatus::Completed {
            warn!(%user, external_id, "rejected repeated paypal capture");

            return Err(WalletServiceError::AlreadyCaptured);
        }

        if pending.amount != amount {
            return Err(WalletServiceError::AmountMismatch);
        }

        let capture = self.gateway.capture_order(external_id).await?;

        if !capture.is_completed() {
            warn!(%user, external_id, status = %capture.status, "paypal capture not completed");

            return Err(WalletServiceError::CaptureNotCompleted(capture.status));
        }

        let new_balance = self
            .repository
            .credit_balance(&mut tx, user, pending.amount)
            .await?
            .ok_or(WalletServiceError::UserNotFound)?;

        let transaction = self
            .repository
            .complete_transaction(
                &mut tx,
                pending.uuid,
                capture.payer_email.as_deref(),
                capture.capture_id.as_deref(),
            )
            .await?;

        tx.commit().await?;

        info!(%user, external_id, amount = %pending.amount, %new_balance, "paypal deposit captured");

        Ok(CapturedDeposit {
            new_balance,
            transaction,
        })
    }

    async fn credit_balance(
        &self,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<CreditedBalance, WalletServiceError> {
        if !is_positive_amount(amount) {
            return Err(WalletServiceError::InvalidAmount);
        }

        let mut tx = self.db.begin_transaction().await?;

        let new_balance = self
            .repository
            .credit_balance(&mut tx, user, amount)
            .await?
            .ok_or(WalletServiceError::UserNotFound)?;

        let transaction = self
            .repository
            .insert_transaction(
                &mut tx,
                &NewWalletTransaction::completed(
                    user,
                    amount,
                    TransactionKind::AdminCredit,
                    TransactionMethod::Admin,
                ),
            )
            .await?;

        tx.commit().await?;

        info!(%user, %amount, %new_balance, "balance credited");

        Ok(CreditedBalance {
            new_balance,
            transaction,
        })
    }

    async fn request_balance(
        &self,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<WalletTransactionRecord, WalletServiceError> {
        if !is_positive_amount(amount) || amount > MAX_AMOUNT {
            return Err(WalletServiceError::InvalidAmount);
        }

        let mut tx = self.db.begin_transaction().await?;

        if self.repository.get_balance(&mut tx, user).await?.is_none() {
            return Err(WalletServiceError::UserNotFound);
        }

        let request = self
            .repository
            .insert_transaction(
                &mut tx,
                &NewWalletTransaction::pending_balance_request(user, amount),
            )
            .await?;

        tx.commit().await?;

        info!(%user, request = %request.uuid, %amount, "balance requested");

        Ok(request)
    }

    async fn list_balance_requests(
        &self,
        status: TransactionStatus,
        page: Page,
    ) -> Result<Paginated<WalletTransactionRecord>, WalletServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let items = self
            .repository
            .list_balance_requests(&mut tx, status, page)
            .await?;
        let total = self.repository.count_balance_requests(&mut tx, status).await?;

        tx.commit().await?;

        Ok(Paginated { items, total, page })
    }

    async fn approve_balance_request(
        &self,
        request: WalletTransactionUuid,
    ) -> Result<CreditedBalance, WalletServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let pending = self.lock_pending_request(&mut tx, request).await?;

        let new_balance = self
            .repository
            .credit_balance(&mut tx, pending.user, pending.amount)
            .await?
            .ok_or(WalletServiceError::UserNotFound)?;

        let transaction = self
            .repository
            .complete_transaction(&mut tx, pending.uuid, None, None)
            .await?;

        tx.commit().await?;

        info!(
            user = %pending.user,
            %request,
            amount = %pending.amount,
            %new_balance,
            "balance request approved"
        );

        Ok(CreditedBalance {
            new_balance,
            transaction,
        })
    }

    async fn reject_balance_request(
        &self,
        request: WalletTransactionUuid,
    ) -> Result<WalletTransactionRecord, WalletServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let pending = self.lock_pending_request(&mut tx, request).await?;

        let transaction = self
            .repository
            .reject_transaction(&mut tx, pending.uuid)
            .await?;

        tx.commit().await?;

        info!(user = %pending.user, %request, "balance request rejected");

        Ok(transaction)
    }
}

#[automock]
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Current balance and ledger, newest first.
    async fn get_wallet(&self, user: UserUuid) -> Result<WalletRecord, WalletServiceError>;

    /// Create a gateway charge and record it as a pending deposit.
    async fn create_paypal_deposit(
        &self,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<WalletTransactionRecord, WalletServiceError>;

    /// Capture an approved deposit and credit the balance.
    async fn capture_paypal_deposit(
        &self,
        user: UserUuid,
        external_id: &str,
        amount: Decimal,
    ) -> Result<CapturedDeposit, WalletServiceError>;

    /// Add funds on behalf of an administrator.
    async fn credit_balance(
        &self,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<CreditedBalance, WalletServiceError>;

    /// Ask an administrator to add funds. Nothing is credited until approval.
    async fn request_balance(
        &self,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<WalletTransactionRecord, WalletServiceError>;

    /// Balance requests in `status`, newest first.
    async fn list_balance_requests(
        &self,
        status: TransactionStatus,
        page: Page,
    ) -> Result<Paginated<WalletTransactionRecord>, WalletServiceError>;

    /// Credit a pending request and mark it completed, in one transaction.
    async fn approve_balance_request(
        &self,
        request: WalletTransactionUuid,
    ) -> Result<CreditedBalance, WalletServiceError>;

    /// Mark a pending request rejected without touching the balance.
    async fn reject_balance_request(
        &self,
        request: WalletTransactionUuid,
    ) -> Result<WalletTransactionRecord, WalletServiceError>;
}
