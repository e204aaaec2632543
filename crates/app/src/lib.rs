//! Top-up storefront domain: users, catalogue, orders, the balance ledger and
//! the payment gateway client, backed by Postgres.

#[macro_use]
mod macros;

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod errors;
pub mod money;
pub mod pagination;
pub mod payments;
pub mod receipts;
pub mod uuids;

#[cfg(test)]
mod test;
