//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the full service: webhook routes under
//! `/api/webhooks`, a liveness probe, and the tower middleware stack.

pub mod webhooks;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use webhooks::{webhook_routes, WebhookAppState};

/// Create the application router.
///
/// # Routes
/// - `POST /api/webhooks/yoco` - Yoco webhook deliveries
/// - `GET /health` - Liveness probe
///
/// Every request gets an `x-request-id` (generated unless the caller sent
/// one) that is echoed on the response and recorded on the trace span.
pub fn app_router(state: WebhookAppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api/webhooks", webhook_routes())
        .route("/health", get(webhooks::health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
}
