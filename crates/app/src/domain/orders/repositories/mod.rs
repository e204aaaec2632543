//! Order Repositories

mod items;
mod orders;
mod status_changes;

pub(crate) use items::PgOrderItemsRepository;
pub(crate) use orders::{LockedOrder, OrderInsert, PgOrdersRepository};
pub(crate) use status_changes::PgOrderStatusChangesRepository;
