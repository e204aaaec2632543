//! Products Data

use rust_decimal::Decimal;

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub price: Decimal,
    pub count_in_stock: u32,
}

/// Product Update Data
///
/// Replaces every editable field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub price: Decimal,
    pub count_in_stock: u32,
}
