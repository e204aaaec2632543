//! Order Items Repository

use std::collections::HashMap;

use sqlx::{Postgres, Row, Transaction, query};
use uuid::Uuid;

use crate::domain::{
    orders::records::{OrderItemRecord, OrderUuid},
    products::records::ProductUuid,
};

const INSERT_ORDER_ITEM_SQL: &str = include_str!("../sql/insert_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert items in cart order.
    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderItemRecord],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in items.iter().enumerate() {
            query(INSERT_ORDER_ITEM_SQL)
                .bind(order.into_uuid())
                .bind(to_i32(position)?)
                .bind(item.product.into_uuid())
                .bind(&item.name)
                .bind(&item.slug)
                .bind(&item.category)
                .bind(&item.image)
                .bind(&item.player_id)
                .bind(to_i32(item.quantity)?)
                .bind(item.price)
                .bind(to_i32(item.count_in_stock)?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Items of every order in `orders`, grouped by order and kept in cart order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<HashMap<OrderUuid, Vec<OrderItemRecord>>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|o| o.into_uuid()).collect();

        let rows = query(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut grouped: HashMap<OrderUuid, Vec<OrderItemRecord>> = HashMap::new();

        for row in rows {
            let order = OrderUuid::from_uuid(row.try_get("order_uuid")?);

            grouped.entry(order).or_default().push(OrderItemRecord {
                product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                name: row.try_get("name")?,
                slug: row.try_get("slug")?,
                category: row.try_get("category")?,
                image: row.try_get("image")?,
                player_id: row.try_get("player_id")?,
                quantity: from_i32(row.try_get("quantity")?, "quantity")?,
                price: row.try_get("price")?,
                count_in_stock: from_i32(row.try_get("count_in_stock")?, "count_in_stock")?,
            });
        }

        Ok(grouped)
    }
}

fn to_i32<T>(value: T) -> Result<i32, sqlx::Error>
where
    i32: TryFrom<T, Error = std::num::TryFromIntError>,
{
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn from_i32(value: i32, column: &str) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
