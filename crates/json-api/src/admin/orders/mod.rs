//! Admin order management

pub(crate) mod delete;
pub(crate) mod history;
pub(crate) mod index;
pub(crate) mod paid;
pub(crate) mod status;
pub(crate) mod summary;
