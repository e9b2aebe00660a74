//! Yoco webhook event types.
//!
//! Defines the structures for parsing Yoco webhook payloads.
//! Only fields relevant to our processing are captured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::webhook::WebhookError;

/// Yoco webhook event (simplified).
///
/// Additional fields from Yoco's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YocoEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created.
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,

    /// The payment or refund the event is about.
    pub payload: YocoPayment,
}

/// Payment or refund object carried by an event.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YocoPayment {
    /// Payment ID (p_xxx) or refund ID.
    pub id: String,

    /// Amount in the smallest currency unit (cents).
    #[serde(rename = "amount")]
    pub amount_cents: i64,

    /// ISO currency code (e.g., "ZAR").
    pub currency: String,

    /// Provider status string ("succeeded", "failed", ...).
    #[serde(default)]
    pub status: Option<String>,

    /// "live" or "test".
    #[serde(default)]
    pub mode: Option<String>,

    /// Original payment, present on refunds.
    #[serde(default)]
    pub payment_id: Option<String>,

    #[serde(default)]
    pub metadata: YocoMetadata,
}

/// Metadata attached at checkout creation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YocoMetadata {
    #[serde(default)]
    pub checkout_id: Option<String>,

    /// Rentio booking the checkout was created for.
    #[serde(default)]
    pub booking_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl YocoEvent {
    /// Deserializes a verified webhook payload.
    pub fn from_value(payload: Value) -> Result<Self, WebhookError> {
        serde_json::from_value(payload).map_err(|e| WebhookError::UnparseableBody(e.to_string()))
    }

    pub fn parsed_type(&self) -> YocoEventType {
        YocoEventType::parse(&self.event_type)
    }

    /// Returns true if this is a live mode event. Events without a mode are
    /// treated as test events.
    pub fn is_live(&self) -> bool {
        self.payload.mode.as_deref() == Some("live")
    }

    /// Booking referenced by the checkout metadata.
    pub fn booking_id(&self) -> Result<&str, WebhookError> {
        self.payload
            .metadata
            .booking_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(WebhookError::MissingMetadata("bookingId"))
    }
}

/// Known Yoco event types that we handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YocoEventType {
    /// Payment captured successfully.
    PaymentSucceeded,
    /// Payment attempt failed.
    PaymentFailed,
    /// Refund completed.
    RefundSucceeded,
    /// Refund attempt failed.
    RefundFailed,
    /// Unknown or unhandled event type.
    Unknown,
}

impl YocoEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "payment.succeeded" => Self::PaymentSucceeded,
            "payment.failed" => Self::PaymentFailed,
            "refund.succeeded" => Self::RefundSucceeded,
            "refund.failed" => Self::RefundFailed,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Yoco event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentSucceeded => "payment.succeeded",
            Self::PaymentFailed => "payment.failed",
            Self::RefundSucceeded => "refund.succeeded",
            Self::RefundFailed => "refund.failed",
            Self::Unknown => "unknown",
        }
    }
}
