//! HTTP adapter for payment provider webhooks.
//!
//! - `POST /api/webhooks/yoco` - Handle Yoco webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse, WebhookAckResponse};
pub use handlers::{envelope_from_headers, health, handle_yoco_webhook, WebhookApiError, WebhookAppState};
pub use routes::webhook_routes;
