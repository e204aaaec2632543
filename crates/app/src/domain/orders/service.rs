//! Orders service.
//!
//! Every payment path runs inside one transaction: the user row is locked
//! before any product rows, the balance debit is conditional, and stock is
//! taken out in the same commit that marks the order paid.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{
            data::{NewOrder, NewOrderItem, SummaryRange},
            errors::OrdersServiceError,
            pricing::OrderPricing,
            records::{
                OrderItemRecord, OrderRecord, OrderStatus, OrderStatusChangeRecord, OrderSummary,
                OrderUuid, PaymentMethod,
            },
            repositories::{
                OrderInsert, PgOrderItemsRepository, PgOrderStatusChangesRepository,
                PgOrdersRepository,
            },
            validation::validate_items,
        },
        products::{PgProductsRepository, records::ProductUuid},
        users::{PgUsersRepository, records::UserUuid},
        wallet::{PgWalletRepository, data::NewWalletTransaction},
    },
    pagination::{Page, Paginated},
    receipts::{ReceiptSender, dispatch_receipt},
};

/// Number of paid orders listed in the admin summary.
pub const LATEST_ORDERS_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    status_changes_repository: PgOrderStatusChangesRepository,
    products_repository: PgProductsRepository,
    users_repository: PgUsersRepository,
    wallet_repository: PgWalletRepository,
    receipts: Arc<dyn ReceiptSender>,
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, receipts: Arc<dyn ReceiptSender>) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            status_changes_repository: PgOrderStatusChangesRepository::new(),
            products_repository: PgProductsRepository::new(),
            users_repository: PgUsersRepository::new(),
            wallet_repository: PgWalletRepository::new(),
            receipts,
        }
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut record = self.orders_repository.get_order(tx, order).await?;

        record.items = self
            .items_repository
            .get_order_items(tx, &[order])
            .await?
            .remove(&order)
            .unwrap_or_default();

        Ok(record)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items = self.items_repository.get_order_items(tx, &uuids).await?;

        for order in &mut orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    /// Lock the ordered products and snapshot them into order items.
    async fn snapshot_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemRecord>, OrdersServiceError> {
        let products: HashMap<ProductUuid, _> = self
            .products_repository
            .lock_products(tx, &unique_products(items.iter().map(|item| item.product)))
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let mut demand: HashMap<ProductUuid, u64> = HashMap::new();

        for item in items {
            *demand.entry(item.product).or_default() += u64::from(item.quantity);
        }

        for (uuid, quantity) in &demand {
            if let Some(product) = products.get(uuid)
                && *quantity > u64::from(product.count_in_stock)
            {
                return Err(OrdersServiceError::InsufficientStock);
            }
        }

        items
            .iter()
            .map(|item| {
                let product = products
                    .get(&item.product)
                    .ok_or(OrdersServiceError::ProductNotFound)?;

                if product.price != item.price {
                    return Err(OrdersServiceError::PriceMismatch);
                }

                Ok(OrderItemRecord {
                    product: product.uuid,
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    category: product.category.clone(),
                    image: product.image.clone(),
                    player_id: item.player_id.clone(),
                    quantity: item.quantity,
                    price: product.price,
                    count_in_stock: product.count_in_stock,
                })
            })
            .collect()
    }

    /// Take each item's quantity out of stock, all or nothing.
    async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[OrderItemRecord],
    ) -> Result<(), OrdersServiceError> {
        let live: Vec<ProductUuid> = self
            .products_repository
            .lock_products(tx, &unique_products(items.iter().map(|item| item.product)))
            .await?
            .into_iter()
            .map(|product| product.uuid)
            .collect();

        for item in items {
            let remaining = self
                .products_repository
                .decrement_stock(tx, item.product, item.quantity)
                .await?;

            if remaining.is_none() {
                return Err(if live.contains(&item.product) {
                    OrdersServiceError::InsufficientStock
                } else {
                    OrdersServiceError::ProductNotFound
                });
            }
        }

        Ok(())
    }

    /// Debit `amount` from a balance the caller has already locked.
    async fn debit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        balance: Decimal,
        amount: Decimal,
    ) -> Result<Decimal, OrdersServiceError> {
        if balance < amount {
            return Err(OrdersServiceError::InsufficientBalance);
        }

        self.wallet_repository
            .debit_balance(tx, user, amount)
            .await?
            .ok_or(OrdersServiceError::InsufficientBalance)
    }

    async fn lock_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Decimal, OrdersServiceError> {
        self.wallet_repository
            .lock_balance(tx, user)
            .await?
            .ok_or(OrdersServiceError::UserNotFound)
    }

    async fn send_receipt(&self, order: &OrderRecord) {
        dispatch_receipt(self.receipts.as_ref(), order).await;
    }
}

fn unique_products(products: impl Iterator<Item = ProductUuid>) -> Vec<ProductUuid> {
    let mut uuids: Vec<ProductUuid> = products.collect();

    uuids.sort_unstable();
    uuids.dedup();

    uuids
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        validate_items(&order.items)?;

        let pricing = OrderPricing::from_items(&order.items)?;

        if !pricing.matches_quote(order.items_price, order.tax_price, order.total_price) {
            return Err(OrdersServiceError::PriceMismatch);
        }

        let mut tx = self.db.begin_transaction().await?;

        let balance = self.lock_balance(&mut tx, user).await?;
        let items = self.snapshot_items(&mut tx, &order.items).await?;

        let is_paid = order.payment_method == PaymentMethod::Balance;

        let balance_snapshot = if is_paid {
            Some(
                self.debit(&mut tx, user, balance, pricing.total_price)
                    .await?,
            )
        } else {
            None
        };

        self.orders_repository
            .create_order(
                &mut tx,
                &OrderInsert {
                    uuid: order.uuid,
                    user,
                    pricing,
                    payment_method: order.payment_method,
                    is_paid,
                    balance_used: if is_paid {
                        pricing.total_price
                    } else {
                        Decimal::ZERO
                    },
                    balance_snapshot,
                },
            )
            .await?;

        self.items_repository
            .create_order_items(&mut tx, order.uuid, &items)
            .await?;

        if is_paid {
            self.wallet_repository
                .insert_transaction(
                    &mut tx,
                    &NewWalletTransaction::order_debit(user, pricing.total_price, order.uuid),
                )
                .await?;

            self.take_stock(&mut tx, &items).await?;
        }

        let created = self.load_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        info!(
            order = %created.uuid,
            %user,
            payment_method = %created.payment_method,
            total = %created.total_price,
            is_paid = created.is_paid,
            "order created"
        );

        if created.is_paid {
            self.send_receipt(&created).await;
        }

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_orders(&self, page: Page) -> Result<Paginated<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders_repository.list_orders(&mut tx, page).await?;
        let orders = self.attach_items(&mut tx, orders).await?;
        let total = self.orders_repository.count_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(Paginated {
            items: orders,
            total,
            page,
        })
    }

    async fn list_user_orders(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<Paginated<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self
            .orders_repository
            .list_user_orders(&mut tx, user, page)
            .await?;
        let orders = self.attach_items(&mut tx, orders).await?;
        let total = self
            .orders_repository
            .count_user_orders(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(Paginated {
            items: orders,
            total,
            page,
        })
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        changed_by: Option<UserUuid>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self
            .orders_repository
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if locked.status != status {
            self.orders_repository
                .set_status(&mut tx, order, status)
                .await?;

            self.status_changes_repository
                .create_status_change(&mut tx, order, locked.status, status, changed_by)
                .await?;

            info!(%order, from = %locked.status, to = %status, "order status changed");
        }

        let updated = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn list_status_changes(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<OrderStatusChangeRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.orders_repository.get_order(&mut tx, order).await?;

        let changes = self
            .status_changes_repository
            .list_status_changes(&mut tx, order)
            .await?;

        tx.commit().await?;

        Ok(changes)
    }

    async fn mark_paid(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self
            .orders_repository
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if locked.is_paid {
            return Err(OrdersServiceError::AlreadyPaid);
        }

        if self.orders_repository.mark_paid(&mut tx, order).await? == 0 {
            return Err(OrdersServiceError::AlreadyPaid);
        }

        let paid = self.load_order(&mut tx, order).await?;

        self.take_stock(&mut tx, &paid.items).await?;

        tx.commit().await?;

        info!(%order, total = %paid.total_price, "order marked paid");

        self.send_receipt(&paid).await;

        Ok(paid)
    }

    async fn pay_with_balance(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self
            .orders_repository
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if locked.user != Some(user) {
            warn!(%order, %user, "balance payment for another user's order");

            return Err(OrdersServiceError::Forbidden);
        }

        if locked.is_paid {
            return Err(OrdersServiceError::AlreadyPaid);
        }

        let balance = self.lock_balance(&mut tx, user).await?;
        let new_balance = self
            .debit(&mut tx, user, balance, locked.total_price)
            .await?;

        if self
            .orders_repository
            .settle_with_balance(&mut tx, order, locked.total_price, new_balance)
            .await?
            == 0
        {
            return Err(OrdersServiceError::AlreadyPaid);
        }

        self.wallet_repository
            .insert_transaction(
                &mut tx,
                &NewWalletTransaction::order_debit(user, locked.total_price, order),
            )
            .await?;

        let paid = self.load_order(&mut tx, order).await?;

        self.take_stock(&mut tx, &paid.items).await?;

        tx.commit().await?;

        info!(%order, %user, total = %paid.total_price, %new_balance, "order paid from balance");

        self.send_receipt(&paid).await;

        Ok(paid)
    }

    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.orders_repository.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(%order, "order deleted");

        Ok(())
    }

    async fn order_summary(&self, range: SummaryRange) -> Result<OrderSummary, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let (total_sales, orders_count) = self.orders_repository.sales_totals(&mut tx, range).await?;
        let users_count = self.users_repository.count_users(&mut tx).await?;
        let products_count = self.products_repository.count_products(&mut tx).await?;
        let monthly_sales = self.orders_repository.monthly_sales(&mut tx, range).await?;

        let latest_orders = self
            .orders_repository
            .latest_paid_orders(&mut tx, range, LATEST_ORDERS_LIMIT)
            .await?;
        let latest_orders = self.attach_items(&mut tx, latest_orders).await?;

        tx.commit().await?;

        Ok(OrderSummary {
            total_sales,
            orders_count,
            users_count,
            products_count,
            monthly_sales,
            latest_orders,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order. Balance orders are paid in the same transaction;
    /// other methods leave the order unpaid.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// All orders, newest first.
    async fn list_orders(&self, page: Page) -> Result<Paginated<OrderRecord>, OrdersServiceError>;

    /// One user's orders, newest first.
    async fn list_user_orders(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<Paginated<OrderRecord>, OrdersServiceError>;

    /// Set the fulfilment status. Setting the current status is a no-op.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        changed_by: Option<UserUuid>,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Status audit trail, oldest first.
    async fn list_status_changes(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<OrderStatusChangeRecord>, OrdersServiceError>;

    /// Record an external payment for an unpaid order.
    async fn mark_paid(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Settle an existing unpaid order from the owner's balance.
    async fn pay_with_balance(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;

    /// Sales figures for paid orders in `range`.
    async fn order_summary(&self, range: SummaryRange) -> Result<OrderSummary, OrdersServiceError>;
}

/// Month key used by the sales summary, in UTC.
#[must_use]
pub fn month_key(timestamp: Timestamp) -> String {
    timestamp.strftime("%Y-%m").to_string()
}
