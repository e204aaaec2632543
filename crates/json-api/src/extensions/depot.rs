//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use topup_app::auth::Principal;

use crate::errors::ApiError;

/// Typed access to what the hoops leave in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated caller, or 401 when the auth hoop did not run.
    fn principal_or_401(&self) -> Result<Principal, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<Principal, ApiError> {
        self.obtain::<Principal>()
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Not authenticated"))
    }
}
