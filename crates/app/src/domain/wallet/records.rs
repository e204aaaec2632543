//! Wallet Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{orders::records::OrderUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Wallet Transaction UUID
pub type WalletTransactionUuid = TypedUuid<WalletTransactionRecord>;

/// Why the balance moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    OrderDebit,
    PaypalDeposit,
    AdminCredit,

    /// Top-up asked for by the customer, credited once an admin approves it.
    BalanceRequest,
}

text_enum!(TransactionKind, "transaction kind", {
    OrderDebit => "order_debit",
    PaypalDeposit => "paypal_deposit",
    AdminCredit => "admin_credit",
    BalanceRequest => "balance_request",
});

impl TransactionKind {
    /// Debits reduce the balance, everything else adds to it.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self, Self::OrderDebit)
    }
}

/// Funding channel of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionMethod {
    Balance,
    Paypal,
    Admin,

    /// Paid outside the store, reviewed by hand.
    Manual,
}

text_enum!(TransactionMethod, "transaction method", {
    Balance => "balance",
    Paypal => "paypal",
    Admin => "admin",
    Manual => "manual",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
}

text_enum!(TransactionStatus, "transaction status", {
    Pending => "pending",
    Completed => "completed",
    Rejected => "rejected",
});

/// One ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletTransactionRecord {
    pub uuid: WalletTransactionUuid,
    pub user: UserUuid,

    /// Always non-negative; the direction comes from `kind`.
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub method: TransactionMethod,

    /// Gateway order id for PayPal deposits.
    pub external_id: Option<String>,
    pub status: TransactionStatus,

    /// Order paid by this row, for debits.
    pub order: Option<OrderUuid>,
    pub payer_email: Option<String>,
    pub capture_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Current balance and ledger of a user.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletRecord {
    pub user: UserUuid,
    pub balance: Decimal,

    /// Newest first.
    pub transactions: Vec<WalletTransactionRecord>,
}

/// Result of crediting a captured PayPal deposit.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedDeposit {
    pub new_balance: Decimal,
    pub transaction: WalletTransactionRecord,
}

/// Result of an admin credit or an approved balance request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditedBalance {
    pub new_balance: Decimal,
    pub transaction: WalletTransactionRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_their_stored_form() {
        for kind in [
            TransactionKind::OrderDebit,
            TransactionKind::PaypalDeposit,
            TransactionKind::AdminCredit,
            TransactionKind::BalanceRequest,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().ok(), Some(kind));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = "refunded".parse::<TransactionStatus>();

        assert!(result.is_err(), "expected an error, got {result:?}");
    }

    #[test]
    fn only_order_debits_reduce_balance() {
        assert!(TransactionKind::OrderDebit.is_debit());
        assert!(!TransactionKind::PaypalDeposit.is_debit());
        assert!(!TransactionKind::AdminCredit.is_debit());
        assert!(!TransactionKind::BalanceRequest.is_debit());
    }
}
