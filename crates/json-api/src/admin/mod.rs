//! Admin endpoints. Mounted behind the admin guard.

pub(crate) mod balance_requests;
pub(crate) mod orders;
pub(crate) mod users;
