use axum::{Router, routing::get};

use bazaar_auth::RouteTable;

pub mod system;

/// Mount every protected template on the downstream handler.
///
/// All methods are routed so that the access-control layer, not the router,
/// decides: a method without a rule is a 403, never a 405.
pub fn router(routes: &RouteTable) -> Router {
    routes.templates().fold(Router::new(), |router, template| {
        router.route(
            template,
            get(system::forward)
                .post(system::forward)
                .put(system::forward)
                .patch(system::forward)
                .delete(system::forward)
                .options(system::forward),
        )
    })
}
