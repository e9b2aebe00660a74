//! HTTP DTOs for webhook endpoints.

use serde::Serialize;

use crate::application::handlers::payment::HandleYocoWebhookResult;

/// Acknowledgement returned for every accepted delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
    /// What the delivery did (`booking_paid`, `already_processed`, ...).
    pub outcome: &'static str,
}

impl From<&HandleYocoWebhookResult> for WebhookAckResponse {
    fn from(result: &HandleYocoWebhookResult) -> Self {
        Self {
            received: true,
            outcome: result.outcome(),
        }
    }
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
