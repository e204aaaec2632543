//! PayPal deposits

pub(crate) mod capture;
pub(crate) mod create;
