//! App Router

use salvo::Router;

use crate::{auth, carts, orders, products};

pub fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .hoop(auth::session::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .post(carts::add::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("coupon")
                        .post(carts::apply_coupon::handler)
                        .delete(carts::remove_coupon::handler),
                )
                .push(
                    Router::with_path("{item}")
                        .put(carts::update::handler)
                        .delete(carts::remove::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(
                    Router::new()
                        .hoop(auth::middleware::require_user)
                        .get(orders::index::handler)
                        .push(Router::with_path("{order}").get(orders::get::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
}
