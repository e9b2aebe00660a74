//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_yoco_webhook, WebhookAppState};

/// Create the payment webhook router.
///
/// Webhooks carry no user authentication; each delivery is verified by
/// signature instead.
///
/// # Routes
/// - `POST /yoco` - Handle Yoco webhooks
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/yoco", post(handle_yoco_webhook))
}
