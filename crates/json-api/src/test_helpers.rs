//! Test helpers.

use std::{str::FromStr, sync::Arc};

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use topup_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderRecord, OrderStatus, OrderUser, OrderUuid, PaymentMethod},
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{
            MockUsersService,
            records::{UserRecord, UserRole, UserUuid},
        },
        wallet::MockWalletService,
    },
};

use crate::{extensions::*, router, state::State};

pub(crate) const TEST_USER: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_ADMIN: UserUuid = UserUuid::from_uuid(Uuid::from_u128(2));
pub(crate) const TEST_PAGE_SIZE: u32 = 10;

/// Service mocks. Any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct AppMocks {
    pub orders: MockOrdersService,
    pub wallet: MockWalletService,
    pub users: MockUsersService,
    pub products: MockProductsService,
    pub auth: MockAuthService,
}

impl AppMocks {
    pub(crate) fn state(self) -> Arc<State> {
        State::new(
            AppContext {
                orders: Arc::new(self.orders),
                wallet: Arc::new(self.wallet),
                users: Arc::new(self.users),
                products: Arc::new(self.products),
                auth: Arc::new(self.auth),
            },
            TEST_PAGE_SIZE,
        )
    }

    pub(crate) fn service(self, route: Router) -> Service {
        router::service(Router::new().hoop(inject(self.state())).push(route))
    }

    /// `route` called by a signed-in customer.
    pub(crate) fn customer_service(self, route: Router) -> Service {
        self.service(Router::new().hoop(inject_customer).push(route))
    }

    /// `route` called by a signed-in administrator.
    pub(crate) fn admin_service(self, route: Router) -> Service {
        self.service(Router::new().hoop(inject_admin).push(route))
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        user: TEST_USER,
        role: UserRole::Customer,
    });
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        user: TEST_ADMIN,
        role: UserRole::Admin,
    });
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "60 Gems".to_owned(),
        slug: "60-gems".to_owned(),
        category: "gems".to_owned(),
        image: "/images/gems.png".to_owned(),
        price: dec("0.99"),
        count_in_stock: 25,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_user(uuid: UserUuid) -> UserRecord {
    UserRecord {
        uuid,
        name: "Sam".to_owned(),
        email: "sam@example.com".to_owned(),
        role: UserRole::Customer,
        balance: dec("40.00"),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// An unpaid PayPal order of two 10.00 items owned by `owner`.
pub(crate) fn make_order(uuid: OrderUuid, owner: UserUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        user: Some(OrderUser {
            uuid: owner,
            name: "Sam".to_owned(),
            email: "sam@example.com".to_owned(),
        }),
        items: vec![OrderItemRecord {
            product: ProductUuid::from_uuid(Uuid::from_u128(7)),
            name: "Battle Pass".to_owned(),
            slug: "battle-pass".to_owned(),
            category: "passes".to_owned(),
            image: "/images/pass.png".to_owned(),
            player_id: "123456789".to_owned(),
            quantity: 2,
            price: dec("10.00"),
            count_in_stock: 5,
        }],
        items_price: dec("20.00"),
        tax_price: dec("3.00"),
        total_price: dec("23.00"),
        payment_method: PaymentMethod::PayPal,
        is_paid: false,
        paid_at: None,
        status: OrderStatus::Pending,
        balance_used: Decimal::ZERO,
        balance_snapshot: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
