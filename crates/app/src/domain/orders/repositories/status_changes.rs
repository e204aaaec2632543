//! Order Status Changes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::decode_text,
    domain::{
        orders::records::{
            OrderStatus, OrderStatusChangeRecord, OrderStatusChangeUuid, OrderUuid,
        },
        users::records::UserUuid,
    },
};

const INSERT_STATUS_CHANGE_SQL: &str = include_str!("../sql/insert_status_change.sql");
const LIST_STATUS_CHANGES_SQL: &str = include_str!("../sql/list_status_changes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderStatusChangesRepository;

impl PgOrderStatusChangesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_status_change(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
        changed_by: Option<UserUuid>,
    ) -> Result<OrderStatusChangeRecord, sqlx::Error> {
        query_as::<Postgres, OrderStatusChangeRecord>(INSERT_STATUS_CHANGE_SQL)
            .bind(OrderStatusChangeUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(changed_by.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_status_changes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderStatusChangeRecord>, sqlx::Error> {
        query_as::<Postgres, OrderStatusChangeRecord>(LIST_STATUS_CHANGES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderStatusChangeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderStatusChangeUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            from: decode_text(row, "from_status")?,
            to: decode_text(row, "to_status")?,
            changed_by: row
                .try_get::<Option<Uuid>, _>("changed_by")?
                .map(UserUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
