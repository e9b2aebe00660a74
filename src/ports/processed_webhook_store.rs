//! ProcessedWebhookStore port - Interface for tracking processed Yoco deliveries.
//!
//! Yoco may deliver the same webhook multiple times due to:
//! - Network timeouts
//! - 5xx response from our endpoint (triggers redelivery)
//! - Our endpoint returning success but Yoco not receiving it
//!
//! Verification itself is stateless; deduplication happens here, after a
//! delivery has been verified and applied.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::PortError;

/// Record of a processed webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookDeliveryRecord {
    /// Delivery ID (`webhook-id` header).
    pub webhook_id: String,

    /// Yoco event ID (evt_xxx format).
    pub event_id: String,

    /// Type of Yoco event (e.g., "payment.succeeded").
    pub event_type: String,

    /// When the delivery was processed.
    pub processed_at: DateTime<Utc>,

    /// Result of processing: "processed" or "ignored".
    pub result: String,

    /// Reason an event was ignored.
    pub note: Option<String>,
}

impl WebhookDeliveryRecord {
    /// Creates a new success record.
    pub fn processed(
        webhook_id: impl Into<String>,
        event_id: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            webhook_id: webhook_id.into(),
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "processed".to_string(),
            note: None,
        }
    }

    /// Creates a new ignored record.
    pub fn ignored(
        webhook_id: impl Into<String>,
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            webhook_id: webhook_id.into(),
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "ignored".to_string(),
            note: Some(reason.into()),
        }
    }
}

/// Result of attempting to save a delivery record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this delivery).
    Inserted,
    /// Record already exists (duplicate delivery).
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook deliveries.
///
/// Implementations should use a uniqueness constraint on `webhook_id` so
/// concurrent deliveries of the same webhook cannot both insert.
#[async_trait]
pub trait ProcessedWebhookStore: Send + Sync {
    /// Find a previously processed delivery by its webhook ID.
    async fn find_by_webhook_id(
        &self,
        webhook_id: &str,
    ) -> Result<Option<WebhookDeliveryRecord>, PortError>;

    /// Attempt to save a delivery record.
    ///
    /// Returns `SaveResult::AlreadyExists` if another request already
    /// inserted the same webhook ID.
    async fn save(&self, record: WebhookDeliveryRecord) -> Result<SaveResult, PortError>;

    /// Delete records processed before the given time. Returns the count deleted.
    async fn delete_before(&self, timestamp: DateTime<Utc>) -> Result<u64, PortError>;
}
