//! Product request and response bodies.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use topup_app::domain::products::{
    data::{NewProduct, ProductUpdate},
    records::{ProductRecord, ProductUuid},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,

    /// Unit price
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,
    pub count_in_stock: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            name: product.name,
            slug: product.slug,
            category: product.category,
            image: product.image,
            price: product.price,
            count_in_stock: product.count_in_stock,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Catalogue fields sent on create and update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductRequest {
    pub name: String,
    pub slug: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,
    pub count_in_stock: u32,
}

impl ProductRequest {
    pub(crate) fn into_new_product(self, uuid: ProductUuid) -> NewProduct {
        NewProduct {
            uuid,
            name: self.name,
            slug: self.slug,
            category: self.category,
            image: self.image,
            price: self.price,
            count_in_stock: self.count_in_stock,
        }
    }
}

impl From<ProductRequest> for ProductUpdate {
    fn from(request: ProductRequest) -> Self {
        Self {
            name: request.name,
            slug: request.slug,
            category: request.category,
            image: request.image,
            price: request.price,
            count_in_stock: request.count_in_stock,
        }
    }
}
