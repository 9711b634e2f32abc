//! HTTP application wiring (Axum router + collaborator wiring).
//!
//! - `services.rs`: builds the access-control state from configuration
//! - `directory.rs`: in-memory identity store and relationship oracle
//! - `routes/`: route mounting and the downstream stand-in handler
//! - `errors.rs`: uniform rejection responses

use axum::{Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware::{self, AccessState};

pub mod directory;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(state: AccessState) -> Router {
    // Protected routes: every template of the route table, gated.
    let protected = routes::router(state.policy.routes()).route_layer(
        axum::middleware::from_fn_with_state(state, middleware::access_control),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)))
}
