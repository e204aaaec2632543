//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    envelope::Envelope,
    errors::ApiError,
    extensions::*,
    products::{ProductRequest, ProductResponse},
    state::State,
};

/// Product Update Handler
///
/// Replaces name, slug, category, image, price and stock.
#[endpoint(
    tags("admin"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .update_product(product.into_inner().into(), json.into_inner().into())
        .await?;

    info!(product = %product.uuid, "product updated");

    Ok(Json(Envelope::ok("Product updated", product.into())))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use topup_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };

    use crate::test_helpers::{AppMocks, dec, make_product};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        AppMocks {
            products,
            ..AppMocks::default()
        }
        .admin_service(Router::with_path("admin/products/{product}").put(handler))
    }

    fn body() -> Value {
        json!({
            "name": "120 Gems",
            "slug": "120-gems",
            "category": "gems",
            "price": 1.89,
            "countInStock": 3
        })
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .withf(move |u, update| {
                *u == uuid && update.price == dec("1.89") && update.image.is_empty()
            })
            .return_once(move |_, update| {
                Ok(topup_app::domain::products::records::ProductRecord {
                    name: update.name,
                    price: update.price,
                    count_in_stock: update.count_in_stock,
                    ..make_product(uuid)
                })
            });

        let mut res = TestClient::put(format!("http://example.com/admin/products/{uuid}"))
            .json(&body())
            .send(&make_service(products))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["name"], "120 Gems");
        assert_eq!(body["data"]["countInStock"], 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/admin/products/{uuid}"))
            .json(&body())
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
