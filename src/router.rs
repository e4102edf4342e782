use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::TraceLayer,
    ServiceBuilderExt,
};

use crate::handlers::{health, not_found};
use crate::proxy::forward;
use crate::state::ProxyState;

/// Default application served by each worker, tagged with its id.
pub fn create_worker_router(server_id: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .set_x_request_id(MakeRequestUuid)
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(Arc::<str>::from(server_id))
}

/// Public-facing router: every method and path goes to [`forward`].
///
/// No layer here may touch the request, the forwarded headers are exact.
pub fn create_proxy_router(state: ProxyState) -> Router {
    Router::new()
        .fallback(any(forward))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
