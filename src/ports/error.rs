//! Errors reported by port implementations.

use thiserror::Error;

use crate::domain::webhook::WebhookError;

/// Failure of an outbound port (ledger, idempotency storage).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store could not be reached or failed.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl From<PortError> for WebhookError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(id) => WebhookError::BookingNotFound(id),
            PortError::Unavailable(msg) => WebhookError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_retryable_booking_not_found() {
        let err: WebhookError = PortError::NotFound("bk_1".to_string()).into();
        assert!(matches!(&err, WebhookError::BookingNotFound(id) if id == "bk_1"));
        assert!(err.is_retryable());
    }

    #[test]
    fn unavailable_maps_to_storage() {
        let err: WebhookError = PortError::Unavailable("timeout".to_string()).into();
        assert!(matches!(err, WebhookError::Storage(_)));
    }
}
