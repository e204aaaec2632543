//! Test Helpers

use rust_decimal::Decimal;

use crate::{
    domain::{
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderUuid, PaymentMethod},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{UserRecord, UserRole, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) const PLAYER_ID: &str = "123456789";

pub(crate) fn new_user(email: &str, balance: Decimal) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        name: "Test Customer".to_string(),
        email: email.to_string(),
        role: UserRole::Customer,
        balance,
    }
}

/// Create a customer with a unique email and the given opening balance.
pub(crate) async fn create_user(
    ctx: &TestContext,
    balance: Decimal,
) -> Result<UserRecord, UsersServiceError> {
    let uuid = UserUuid::new();

    ctx.users
        .create_user(NewUser {
            uuid,
            ..new_user(&format!("{}@example.com", uuid.into_uuid().simple()), balance)
        })
        .await
}

pub(crate) fn new_product(slug: &str, price: Decimal, count_in_stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: format!("Product {slug}"),
        slug: slug.to_string(),
        category: "diamonds".to_string(),
        image: format!("/images/{slug}.png"),
        price,
        count_in_stock,
    }
}

/// Create a product with a unique slug.
pub(crate) async fn create_product(
    ctx: &TestContext,
    price: Decimal,
    count_in_stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    let uuid = ProductUuid::new();

    ctx.products
        .create_product(NewProduct {
            uuid,
            ..new_product(
                &format!("product-{}", uuid.into_uuid().simple()),
                price,
                count_in_stock,
            )
        })
        .await
}

/// A cart line at the product's current price.
pub(crate) fn cart_item(product: &ProductRecord, quantity: u32) -> NewOrderItem {
    NewOrderItem {
        product: product.uuid,
        player_id: PLAYER_ID.to_string(),
        quantity,
        price: product.price,
    }
}

/// An order with no client-side totals to check.
pub(crate) fn new_order(items: Vec<NewOrderItem>, payment_method: PaymentMethod) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        items,
        payment_method,
        items_price: None,
        tax_price: None,
        total_price: None,
    }
}
