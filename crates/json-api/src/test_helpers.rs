//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use auvea_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::MockCartsService,
        coupons::MockCouponsService,
        orders::MockOrdersService,
        products::{
            MockProductsService,
            records::{CategoryUuid, ProductUuid},
            view::{CategoryView, ProductView},
        },
        users::{MockUsersService, records::UserUuid},
    },
};

use crate::{auth, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_BEARER_TOKEN: &str = "auv_v1_test-token";

pub(crate) const TEST_SESSION_ID: &str = "guest-session-0001";

/// Service mocks backing a test [`State`]. Anything a test does not replace rejects
/// every call.
#[derive(Debug)]
pub(crate) struct Mocks {
    pub carts: MockCartsService,
    pub orders: MockOrdersService,
    pub products: MockProductsService,
    pub auth: MockAuthService,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            carts: strict_carts_mock(),
            orders: strict_orders_mock(),
            products: strict_products_mock(),
            auth: authenticating_auth_mock(),
        }
    }
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        let mut coupons = MockCouponsService::new();

        coupons.expect_find_by_code().never();
        coupons.expect_create_coupon().never();

        let mut users = MockUsersService::new();

        users.expect_create_user().never();
        users.expect_get_user().never();

        State::from_app_context(AppContext {
            carts: Arc::new(self.carts),
            coupons: Arc::new(coupons),
            orders: Arc::new(self.orders),
            products: Arc::new(self.products),
            users: Arc::new(users),
            auth: Arc::new(self.auth),
        })
    }

    /// Serve `route` behind the same identity middleware as the real router.
    pub(crate) fn into_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(auth::middleware::handler)
                .hoop(auth::session::handler)
                .push(route),
        )
    }
}

/// Accepts [`TEST_BEARER_TOKEN`] as [`TEST_USER_UUID`].
fn authenticating_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer()
        .withf(|token| token == TEST_BEARER_TOKEN)
        .returning(|_| Ok(TEST_USER_UUID));

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item_quantity().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_apply_coupon().never();
    carts.expect_remove_coupon().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_place_order().never();
    orders.expect_list_orders().never();
    orders.expect_get_order().never();

    orders
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_category().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Mocks {
        carts,
        ..Mocks::default()
    }
    .into_service(route)
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Mocks {
        orders,
        ..Mocks::default()
    }
    .into_service(route)
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Mocks {
        products,
        ..Mocks::default()
    }
    .into_service(route)
}

pub(crate) fn make_product_view(uuid: ProductUuid, price: Decimal) -> ProductView {
    ProductView {
        uuid,
        category: CategoryView {
            uuid: CategoryUuid::from_uuid(Uuid::nil()),
            name: "Rings".to_string(),
            slug: "rings".to_string(),
        },
        name: "Lotus Ring".to_string(),
        description: "Printable ring".to_string(),
        sku: "RING-001".to_string(),
        price,
        discount_price: None,
        final_price: price,
        file_format: Some("STL".to_string()),
        file_size: None,
        is_featured: false,
        downloads_count: 0,
        views_count: 0,
        images: vec!["https://auvea.test/storage/products/lotus.png".to_string()],
        preview_images: vec![],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
