//! Booking-level view of a Yoco payment event.

use super::yoco_event::YocoEvent;
use crate::domain::webhook::WebhookError;

/// What the booking ledger needs to know about a payment or refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotice {
    pub booking_id: String,
    /// Yoco payment (or refund) ID.
    pub provider_reference: String,
    pub checkout_id: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    /// Event that carried this notice.
    pub event_id: String,
    pub live: bool,
}

impl PaymentNotice {
    /// Extracts a notice from a trusted event.
    ///
    /// # Errors
    ///
    /// `MissingMetadata("bookingId")` when the checkout was created without
    /// a booking reference.
    pub fn from_event(event: &YocoEvent) -> Result<Self, WebhookError> {
        Ok(Self {
            booking_id: event.booking_id()?.to_string(),
            provider_reference: event.payload.id.clone(),
            checkout_id: event.payload.metadata.checkout_id.clone(),
            amount_cents: event.payload.amount_cents,
            currency: event.payload.currency.clone(),
            event_id: event.id.clone(),
            live: event.is_live(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_event_copies_booking_fields() {
        let event = YocoEvent::from_value(json!({
            "id": "evt_1",
            "type": "payment.succeeded",
            "payload": {
                "id": "p_1",
                "amount": 12500,
                "currency": "ZAR",
                "mode": "test",
                "metadata": { "checkoutId": "ch_1", "bookingId": "bk_1" }
            }
        }))
        .unwrap();

        let notice = PaymentNotice::from_event(&event).unwrap();

        assert_eq!(
            notice,
            PaymentNotice {
                booking_id: "bk_1".to_string(),
                provider_reference: "p_1".to_string(),
                checkout_id: Some("ch_1".to_string()),
                amount_cents: 12500,
                currency: "ZAR".to_string(),
                event_id: "evt_1".to_string(),
                live: false,
            }
        );
    }

    #[test]
    fn from_event_requires_booking_id() {
        let event = YocoEvent::from_value(json!({
            "id": "evt_1",
            "type": "payment.succeeded",
            "payload": { "id": "p_1", "amount": 1, "currency": "ZAR" }
        }))
        .unwrap();

        assert!(matches!(
            PaymentNotice::from_event(&event),
            Err(WebhookError::MissingMetadata("bookingId"))
        ));
    }
}
