//! Wallet Repository
//!
//! The only code that writes `users.balance`. Debits are conditional on the
//! current balance so concurrent spenders cannot overdraw an account.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::decode_text,
    domain::{
        orders::records::OrderUuid,
        users::records::UserUuid,
        wallet::{
            data::NewWalletTransaction,
            records::{
                TransactionMethod, TransactionStatus, WalletTransactionRecord,
                WalletTransactionUuid,
            },
        },
    },
    pagination::Page,
};

const LOCK_BALANCE_SQL: &str = include_str!("sql/lock_balance.sql");
const GET_BALANCE_SQL: &str = include_str!("sql/get_balance.sql");
const DEBIT_BALANCE_SQL: &str = include_str!("sql/debit_balance.sql");
const CREDIT_BALANCE_SQL: &str = include_str!("sql/credit_balance.sql");
const INSERT_TRANSACTION_SQL: &str = include_str!("sql/insert_transaction.sql");
const LIST_TRANSACTIONS_SQL: &str = include_str!("sql/list_transactions.sql");
const LOCK_TRANSACTION_BY_EXTERNAL_ID_SQL: &str =
    include_str!("sql/lock_transaction_by_external_id.sql");
const COMPLETE_TRANSACTION_SQL: &str = include_str!("sql/complete_transaction.sql");
const LOCK_TRANSACTION_SQL: &str = include_str!("sql/lock_transaction.sql");
const REJECT_TRANSACTION_SQL: &str = include_str!("sql/reject_transaction.sql");
const LIST_BALANCE_REQUESTS_SQL: &str = include_str!("sql/list_balance_requests.sql");
const COUNT_BALANCE_REQUESTS_SQL: &str = include_str!("sql/count_balance_requests.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWalletRepository;

impl PgWalletRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the user row and return its balance, `None` if the user does not exist.
    pub(crate) async fn lock_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        query_scalar(LOCK_BALANCE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        query_scalar(GET_BALANCE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Subtract `amount` when the balance covers it. Returns the new balance,
    /// or `None` when the user is missing or the balance is too low.
    pub(crate) async fn debit_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        query_scalar(DEBIT_BALANCE_SQL)
            .bind(user.into_uuid())
            .bind(amount)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Add `amount`. Returns the new balance, `None` when the user is missing.
    pub(crate) async fn credit_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        amount: Decimal,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        query_scalar(CREDIT_BALANCE_SQL)
            .bind(user.into_uuid())
            .bind(amount)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn insert_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction: &NewWalletTransaction,
    ) -> Result<WalletTransactionRecord, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(INSERT_TRANSACTION_SQL)
            .bind(transaction.uuid.into_uuid())
            .bind(transaction.user.into_uuid())
            .bind(transaction.amount)
            .bind(transaction.kind.as_str())
            .bind(transaction.method.as_str())
            .bind(transaction.external_id.as_deref())
            .bind(transaction.status.as_str())
            .bind(transaction.order.map(OrderUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_transactions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<WalletTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(LIST_TRANSACTIONS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn lock_transaction_by_external_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        method: TransactionMethod,
        external_id: &str,
    ) -> Result<Option<WalletTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(LOCK_TRANSACTION_BY_EXTERNAL_ID_SQL)
            .bind(user.into_uuid())
            .bind(method.as_str())
            .bind(external_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Move a pending row to completed. `RowNotFound` when it was not pending.
    pub(crate) async fn complete_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction: WalletTransactionUuid,
        payer_email: Option<&str>,
        capture_id: Option<&str>,
    ) -> Result<WalletTransactionRecord, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(COMPLETE_TRANSACTION_SQL)
            .bind(transaction.into_uuid())
            .bind(payer_email)
            .bind(capture_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction: WalletTransactionUuid,
    ) -> Result<Option<WalletTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(LOCK_TRANSACTION_SQL)
            .bind(transaction.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Move a pending row to rejected. `RowNotFound` when it was not pending.
    pub(crate) async fn reject_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction: WalletTransactionUuid,
    ) -> Result<WalletTransactionRecord, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(REJECT_TRANSACTION_SQL)
            .bind(transaction.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_balance_requests(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: TransactionStatus,
        page: Page,
    ) -> Result<Vec<WalletTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(LIST_BALANCE_REQUESTS_SQL)
            .bind(status.as_str())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_balance_requests(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: TransactionStatus,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_BALANCE_REQUESTS_SQL)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

impl<'r> FromRow<'r, PgRow> for WalletTransactionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WalletTransactionUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            amount: row.try_get("amount")?,
            kind: decode_text(row, "kind")?,
            method: decode_text(row, "method")?,
            external_id: row.try_get("external_id")?,
            status: decode_text(row, "status")?,
            order: row
                .try_get::<Option<Uuid>, _>("order_uuid")?
                .map(OrderUuid::from_uuid),
            payer_email: row.try_get("payer_email")?,
            capture_id: row.try_get("capture_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
