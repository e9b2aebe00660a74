//! HTTP handlers for webhook endpoints.
//!
//! These handlers connect Axum routes to the application layer webhook handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde_json::json;

use crate::application::handlers::payment::{HandleYocoWebhookCommand, HandleYocoWebhookHandler};
use crate::domain::webhook::{
    WebhookEnvelope, WebhookError, YocoWebhookVerifier, WEBHOOK_ID_HEADER,
    WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
};
use crate::ports::{BookingPaymentLedger, ProcessedWebhookStore};

use super::dto::{ErrorResponse, HealthResponse, WebhookAckResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<YocoWebhookVerifier>,
    pub booking_ledger: Arc<dyn BookingPaymentLedger>,
    pub processed_webhooks: Arc<dyn ProcessedWebhookStore>,
}

impl WebhookAppState {
    pub fn webhook_handler(&self) -> HandleYocoWebhookHandler {
        HandleYocoWebhookHandler::new(
            self.verifier.clone(),
            self.booking_ledger.clone(),
            self.processed_webhooks.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/yoco - Handle Yoco webhook events
pub async fn handle_yoco_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let cmd = HandleYocoWebhookCommand {
        envelope: envelope_from_headers(&headers, body),
    };

    let result = state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookAckResponse::from(&result)))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Builds the envelope from request headers and the untouched body bytes.
///
/// Absent or non-UTF-8 headers become empty strings, which verification
/// rejects as malformed.
pub fn envelope_from_headers(headers: &HeaderMap, body: Bytes) -> WebhookEnvelope {
    WebhookEnvelope::new(
        header_str(headers, WEBHOOK_ID_HEADER),
        header_str(headers, WEBHOOK_TIMESTAMP_HEADER),
        header_str(headers, WEBHOOK_SIGNATURE_HEADER),
        body.to_vec(),
    )
}

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error_code = self.0.error_code(),
                retryable = self.0.is_retryable(),
                error = %self.0,
                "Webhook delivery failed"
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                error_code = self.0.error_code(),
                verification_failure = self.0.is_verification_failure(),
                error = %self.0,
                "Rejected webhook delivery"
            );
        }

        // Server-side failures are reported without internals
        let body = match &self.0 {
            WebhookError::StaleOrFutureTimestamp { age_secs } => ErrorResponse::with_details(
                self.0.error_code(),
                "Webhook timestamp outside tolerance",
                json!({ "age_secs": age_secs }),
            ),
            _ if status.is_server_error() => {
                ErrorResponse::new(self.0.error_code(), "Webhook could not be processed")
            }
            _ => ErrorResponse::new(self.0.error_code(), self.0.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
