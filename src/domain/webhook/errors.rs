//! Webhook error types for Yoco webhook handling.
//!
//! Covers both verification failures (the request could not be trusted) and
//! processing failures (the trusted event could not be applied), with HTTP
//! status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook verification and processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Required webhook headers are missing or unparseable.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Webhook timestamp is outside the replay window.
    #[error("Timestamp outside tolerance ({age_secs}s from now)")]
    StaleOrFutureTimestamp { age_secs: i64 },

    /// Configured signing secret cannot be used. Operator error, not caused
    /// by the request.
    #[error("Misconfigured webhook secret: {0}")]
    MisconfiguredSecret(String),

    /// No signature candidate matched the expected signature.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature was valid but the body is not the JSON we expected.
    #[error("Unparseable body: {0}")]
    UnparseableBody(String),

    /// Required metadata field missing from the payment payload.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Referenced booking could not be found.
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    /// Ledger or idempotency storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    /// Returns true if Yoco should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Storage(_) | WebhookError::BookingNotFound(_) // Might be eventual consistency
        )
    }

    /// Returns true for failures of the authenticity checks themselves.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MalformedRequest(_)
                | WebhookError::StaleOrFutureTimestamp { .. }
                | WebhookError::InvalidSignature
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine Yoco's redelivery behavior:
    /// - 4xx: Client error, no retry
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,

            WebhookError::MalformedRequest(_)
            | WebhookError::StaleOrFutureTimestamp { .. }
            | WebhookError::UnparseableBody(_)
            | WebhookError::MissingMetadata(_) => StatusCode::BAD_REQUEST,

            WebhookError::MisconfiguredSecret(_)
            | WebhookError::BookingNotFound(_)
            | WebhookError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            WebhookError::MalformedRequest(_) => "MALFORMED_REQUEST",
            WebhookError::StaleOrFutureTimestamp { .. } => "STALE_TIMESTAMP",
            WebhookError::MisconfiguredSecret(_) => "MISCONFIGURED_SECRET",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::UnparseableBody(_) => "UNPARSEABLE_BODY",
            WebhookError::MissingMetadata(_) => "MISSING_METADATA",
            WebhookError::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            WebhookError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
