//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{envelope::Acknowledgement, errors::ApiError, extensions::*, state::State};

/// Delete Product Handler
///
/// Soft-deletes the product. Orders keep their item snapshots.
#[endpoint(
    tags("admin"),
    summary = "Delete Product",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Acknowledgement>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();

    state.app.products.delete_product(product.into()).await?;

    info!(%product, "product deleted");

    Ok(Json(Acknowledgement::ok("Product deleted")))
}
