//! Wallet balance and its ledger.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::WalletServiceError;
pub(crate) use repository::PgWalletRepository;
pub use service::*;
