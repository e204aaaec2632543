//! Admin review of customer balance requests

pub(crate) mod index;
pub(crate) mod review;
