//! Products service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
    money::round2,
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        validate_fields(&product.name, &product.slug, product.price)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        info!(product = %created.uuid, slug = %created.slug, "product created");

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        validate_fields(&update.name, &update.slug, update.price)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(%product, "product deleted");

        Ok(())
    }
}

fn validate_fields(name: &str, slug: &str, price: Decimal) -> Result<(), ProductsServiceError> {
    if name.trim().is_empty() || slug.trim().is_empty() {
        return Err(ProductsServiceError::MissingRequiredData);
    }

    if price < Decimal::ZERO || round2(price) != price {
        return Err(ProductsServiceError::InvalidData);
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all live products, newest first.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single live product.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces the editable fields of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product. Existing orders keep their item snapshots.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_product};

    use super::*;

    #[tokio::test]
    async fn create_product_returns_record() -> TestResult {
        let ctx = TestContext::new().await;
        let product = new_product("diamonds-100", Decimal::from_str("9.99")?, 5);
        let uuid = product.uuid;

        let created = ctx.products.create_product(product).await?;

        assert_eq!(created.uuid, uuid);
        assert_eq!(created.price, Decimal::from_str("9.99")?);
        assert_eq!(created.count_in_stock, 5);
        assert!(created.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_product_returns_created_product() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx
            .products
            .create_product(new_product("gems-50", Decimal::from(15), 3))
            .await?;

        let product = ctx.products.get_product(created.uuid).await?;

        assert_eq!(product, created);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_excludes_deleted() -> TestResult {
        let ctx = TestContext::new().await;

        let kept = ctx
            .products
            .create_product(new_product("kept", Decimal::from(1), 1))
            .await?;
        let removed = ctx
            .products
            .create_product(new_product("removed", Decimal::from(1), 1))
            .await?;

        ctx.products.delete_product(removed.uuid).await?;

        let products = ctx.products.list_products().await?;

        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|p| p.uuid), Some(kept.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products
            .create_product(new_product("same-slug", Decimal::from(1), 1))
            .await?;

        let result = ctx
            .products
            .create_product(new_product("same-slug", Decimal::from(2), 1))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn slug_of_deleted_product_can_be_reused() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .products
            .create_product(new_product("recycled", Decimal::from(1), 1))
            .await?;

        ctx.products.delete_product(first.uuid).await?;

        let second = ctx
            .products
            .create_product(new_product("recycled", Decimal::from(1), 1))
            .await?;

        assert_ne!(first.uuid, second.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(new_product("cheap", Decimal::from(-1), 1))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_replaces_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx
            .products
            .create_product(new_product("old", Decimal::from(1), 1))
            .await?;

        let updated = ctx
            .products
            .update_product(
                created.uuid,
                ProductUpdate {
                    name: "New".to_string(),
                    slug: "new".to_string(),
                    category: "coins".to_string(),
                    image: "/images/new.png".to_string(),
                    price: Decimal::from_str("4.50")?,
                    count_in_stock: 40,
                },
            )
            .await?;

        assert_eq!(updated.slug, "new");
        assert_eq!(updated.price, Decimal::from_str("4.50")?);
        assert_eq!(updated.count_in_stock, 40);
        assert!(updated.updated_at >= created.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx
            .products
            .create_product(new_product("once", Decimal::from(1), 1))
            .await?;

        ctx.products.delete_product(created.uuid).await?;

        let result = ctx.products.delete_product(created.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
