//! Wallet Data

use rust_decimal::Decimal;

use crate::domain::{
    orders::records::OrderUuid,
    users::records::UserUuid,
    wallet::records::{
        TransactionKind, TransactionMethod, TransactionStatus, WalletTransactionUuid,
    },
};

/// New ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWalletTransaction {
    pub uuid: WalletTransactionUuid,
    pub user: UserUuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub method: TransactionMethod,
    pub external_id: Option<String>,
    pub status: TransactionStatus,
    pub order: Option<OrderUuid>,
}

impl NewWalletTransaction {
    /// A row for a balance movement that has already been applied.
    #[must_use]
    pub fn completed(
        user: UserUuid,
        amount: Decimal,
        kind: TransactionKind,
        method: TransactionMethod,
    ) -> Self {
        Self {
            uuid: WalletTransactionUuid::new(),
            user,
            amount,
            kind,
            method,
            external_id: None,
            status: TransactionStatus::Completed,
            order: None,
        }
    }

    /// The debit that paid `order`.
    #[must_use]
    pub fn order_debit(user: UserUuid, amount: Decimal, order: OrderUuid) -> Self {
        Self {
            order: Some(order),
            ..Self::completed(
                user,
                amount,
                TransactionKind::OrderDebit,
                TransactionMethod::Balance,
            )
        }
    }

    /// A PayPal deposit awaiting capture.
    #[must_use]
    pub fn pending_paypal_deposit(user: UserUuid, amount: Decimal, external_id: String) -> Self {
        Self {
            external_id: Some(external_id),
            status: TransactionStatus::Pending,
            ..Self::completed(
                user,
                amount,
                TransactionKind::PaypalDeposit,
                TransactionMethod::Paypal,
            )
        }
    }

    /// A top-up the customer asked for, waiting for an admin.
    #[must_use]
    pub fn pending_balance_request(user: UserUuid, amount: Decimal) -> Self {
        Self {
            status: TransactionStatus::Pending,
            ..Self::completed(
                user,
                amount,
                TransactionKind::BalanceRequest,
                TransactionMethod::Manual,
            )
        }
    }
}
