//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::decode_text,
    domain::{
        orders::{
            data::SummaryRange,
            pricing::OrderPricing,
            records::{
                MonthlySales, OrderRecord, OrderStatus, OrderUser, OrderUuid, PaymentMethod,
            },
        },
        users::records::UserUuid,
    },
    pagination::Page,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("../sql/count_user_orders.sql");
const MARK_PAID_SQL: &str = include_str!("../sql/mark_paid.sql");
const SETTLE_WITH_BALANCE_SQL: &str = include_str!("../sql/settle_with_balance.sql");
const SET_STATUS_SQL: &str = include_str!("../sql/set_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");
const SALES_TOTALS_SQL: &str = include_str!("../sql/sales_totals.sql");
const MONTHLY_SALES_SQL: &str = include_str!("../sql/monthly_sales.sql");
const LATEST_PAID_ORDERS_SQL: &str = include_str!("../sql/latest_paid_orders.sql");

/// Row values for a new order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderInsert {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub pricing: OrderPricing,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub balance_used: Decimal,
    pub balance_snapshot: Option<Decimal>,
}

/// The columns a payment or status change needs, read under `FOR UPDATE`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LockedOrder {
    pub user: Option<UserUuid>,
    pub is_paid: bool,
    pub status: OrderStatus,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderInsert,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(order.pricing.items_price)
            .bind(order.pricing.tax_price)
            .bind(order.pricing.total_price)
            .bind(order.payment_method.as_str())
            .bind(order.is_paid)
            .bind(order.balance_used)
            .bind(order.balance_snapshot)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Fetch an order without its items.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<LockedOrder>, sqlx::Error> {
        query_as::<Postgres, LockedOrder>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: Page,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL).fetch_one(&mut **tx).await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: Page,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Flag an unpaid order as paid. Returns rows affected; 0 means missing or already paid.
    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_PAID_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn settle_with_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        balance_used: Decimal,
        balance_snapshot: Decimal,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SETTLE_WITH_BALANCE_SQL)
            .bind(order.into_uuid())
            .bind(balance_used)
            .bind(balance_snapshot)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Sum and count of paid orders in `range`.
    pub(crate) async fn sales_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        range: SummaryRange,
    ) -> Result<(Decimal, u64), sqlx::Error> {
        let (total_sales, orders_count): (Decimal, i64) = query_as(SALES_TOTALS_SQL)
            .bind(range.from.map(SqlxTimestamp::from))
            .bind(range.to.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await?;

        Ok((total_sales, u64::try_from(orders_count).unwrap_or_default()))
    }

    pub(crate) async fn monthly_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        range: SummaryRange,
    ) -> Result<Vec<MonthlySales>, sqlx::Error> {
        let rows: Vec<(String, Decimal)> = query_as(MONTHLY_SALES_SQL)
            .bind(range.from.map(SqlxTimestamp::from))
            .bind(range.to.map(SqlxTimestamp::from))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(month, total)| MonthlySales { month, total })
            .collect())
    }

    pub(crate) async fn latest_paid_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        range: SummaryRange,
        limit: i64,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LATEST_PAID_ORDERS_SQL)
            .bind(range.from.map(SqlxTimestamp::from))
            .bind(range.to.map(SqlxTimestamp::from))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let user_uuid: Option<Uuid> = row.try_get("user_uuid")?;
        let user_name: Option<String> = row.try_get("user_name")?;
        let user_email: Option<String> = row.try_get("user_email")?;

        let user = match (user_uuid, user_name, user_email) {
            (Some(uuid), Some(name), Some(email)) => Some(OrderUser {
                uuid: UserUuid::from_uuid(uuid),
                name,
                email,
            }),
            _ => None,
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user,
            items: Vec::new(),
            items_price: row.try_get("items_price")?,
            tax_price: row.try_get("tax_price")?,
            total_price: row.try_get("total_price")?,
            payment_method: decode_text(row, "payment_method")?,
            is_paid: row.try_get("is_paid")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            status: decode_text(row, "status")?,
            balance_used: row.try_get("balance_used")?,
            balance_snapshot: row.try_get("balance_snapshot")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LockedOrder {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            is_paid: row.try_get("is_paid")?,
            status: decode_text(row, "status")?,
            total_price: row.try_get("total_price")?,
        })
    }
}
