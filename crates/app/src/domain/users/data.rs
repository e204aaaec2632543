//! Users Data

use rust_decimal::Decimal;

use crate::domain::users::records::{UserRole, UserUuid};

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,

    /// Opening balance, usually zero.
    pub balance: Decimal,
}

/// Editable profile fields of an existing user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
