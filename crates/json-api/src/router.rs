//! App Router

use std::sync::Arc;

use salvo::{affix_state::inject, catcher::Catcher, prelude::*, trailing_slash::remove_slash};

use crate::{
    admin, auth, errors, healthcheck, observability, orders, products, state::State, wallet,
};

/// Wrap a router so framework errors also leave as failure envelopes.
pub(crate) fn service(router: Router) -> Service {
    Service::new(router).catcher(Catcher::default().hoop(errors::envelope_catcher))
}

pub(crate) fn app_router(state: Arc<State>) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(customer_routes())
                .push(
                    Router::with_path("admin")
                        .hoop(auth::admin::handler)
                        .push(admin_routes()),
                ),
        )
}

fn customer_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("pay").post(orders::pay::handler)),
                ),
        )
        .push(
            Router::with_path("wallet")
                .get(wallet::get::handler)
                .push(Router::with_path("balance-requests").post(wallet::request::handler))
                .push(
                    Router::with_path("paypal")
                        .push(
                            Router::with_path("create-order").post(wallet::paypal::create::handler),
                        )
                        .push(
                            Router::with_path("capture-order")
                                .post(wallet::paypal::capture::handler),
                        ),
                ),
        )
}

fn admin_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("orders")
                .get(admin::orders::index::handler)
                .push(Router::with_path("summary").get(admin::orders::summary::handler))
                .push(
                    Router::with_path("{order}")
                        .delete(admin::orders::delete::handler)
                        .push(Router::with_path("status").put(admin::orders::status::handler))
                        .push(Router::with_path("history").get(admin::orders::history::handler))
                        .push(Router::with_path("complete").post(admin::orders::status::complete))
                        .push(Router::with_path("reject").post(admin::orders::status::reject))
                        .push(Router::with_path("pending").post(admin::orders::status::pending))
                        .push(Router::with_path("paid").post(admin::orders::paid::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("users")
                .get(admin::users::index::handler)
                .push(
                    Router::with_path("{user}")
                        .get(admin::users::get::handler)
                        .put(admin::users::update::handler)
                        .delete(admin::users::delete::handler)
                        .push(Router::with_path("balance").post(admin::users::credit::handler)),
                ),
        )
        .push(
            Router::with_path("balance-requests")
                .get(admin::balance_requests::index::handler)
                .push(
                    Router::with_path("{request}")
                        .push(
                            Router::with_path("approve")
                                .post(admin::balance_requests::review::approve),
                        )
                        .push(
                            Router::with_path("reject").post(admin::balance_requests::review::reject),
                        ),
                ),
        )
}
