//! Inbound webhook envelope.

use super::errors::WebhookError;

/// Header carrying the unique delivery identifier.
pub const WEBHOOK_ID_HEADER: &str = "webhook-id";

/// Header carrying the Unix timestamp (seconds) the delivery was signed at.
pub const WEBHOOK_TIMESTAMP_HEADER: &str = "webhook-timestamp";

/// Header carrying the space-separated signature tokens.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "webhook-signature";

/// A single webhook delivery exactly as received.
///
/// Header values are kept as raw strings: the timestamp in particular is
/// signed in its textual form, so it must never be re-formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEnvelope {
    /// Delivery ID (`webhook-id`).
    pub id: String,
    /// Unix seconds as a decimal string (`webhook-timestamp`).
    pub timestamp: String,
    /// Raw `webhook-signature` header value.
    pub signature_header: String,
    /// Exact request body bytes.
    pub body: Vec<u8>,
}

impl WebhookEnvelope {
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        signature_header: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            signature_header: signature_header.into(),
            body: body.into(),
        }
    }

    /// Ensures every header the scheme depends on is present.
    pub fn check_presence(&self) -> Result<(), WebhookError> {
        if self.id.is_empty() {
            return Err(WebhookError::MalformedRequest(format!(
                "missing {}",
                WEBHOOK_ID_HEADER
            )));
        }
        if self.timestamp.is_empty() {
            return Err(WebhookError::MalformedRequest(format!(
                "missing {}",
                WEBHOOK_TIMESTAMP_HEADER
            )));
        }
        if self.signature_header.is_empty() {
            return Err(WebhookError::MalformedRequest(format!(
                "missing {}",
                WEBHOOK_SIGNATURE_HEADER
            )));
        }
        Ok(())
    }

    /// Parses the timestamp header as whole Unix seconds.
    pub fn timestamp_secs(&self) -> Result<i64, WebhookError> {
        self.timestamp.parse::<i64>().map_err(|_| {
            WebhookError::MalformedRequest(format!(
                "{} is not an integer: {:?}",
                WEBHOOK_TIMESTAMP_HEADER, self.timestamp
            ))
        })
    }
}
