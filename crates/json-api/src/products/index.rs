//! Product Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::Envelope, errors::ApiError, extensions::*, products::ProductResponse, state::State,
};

/// Product Index Handler
///
/// Returns every live product, newest first.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<Vec<ProductResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state.app.products.list_products().await?;

    Ok(Json(Envelope::ok(
        "Products fetched",
        products.into_iter().map(Into::into).collect(),
    )))
}
