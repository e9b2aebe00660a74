//! HandleYocoWebhookHandler - Command handler for processing Yoco webhooks.

use std::sync::Arc;

use crate::domain::payment::{PaymentNotice, YocoEvent, YocoEventType};
use crate::domain::webhook::{WebhookEnvelope, WebhookError, YocoWebhookVerifier};
use crate::ports::{BookingPaymentLedger, ProcessedWebhookStore, SaveResult, WebhookDeliveryRecord};

/// Command to handle a Yoco webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleYocoWebhookCommand {
    /// Delivery headers and raw body.
    pub envelope: WebhookEnvelope,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleYocoWebhookResult {
    /// Payment succeeded, booking marked paid.
    BookingPaid {
        booking_id: String,
        payment_id: String,
    },
    /// Payment failed, failure recorded on the booking.
    PaymentFailed { booking_id: String },
    /// Refund succeeded, refund recorded on the booking.
    RefundRecorded { booking_id: String },
    /// Event acknowledged but no action taken.
    Acknowledged,
    /// Event ignored (unknown or unsupported type).
    Ignored { event_type: String },
    /// Delivery was already processed earlier (idempotent skip).
    AlreadyProcessed,
}

impl HandleYocoWebhookResult {
    /// Short label for responses and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::BookingPaid { .. } => "booking_paid",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::RefundRecorded { .. } => "refund_recorded",
            Self::Acknowledged => "acknowledged",
            Self::Ignored { .. } => "ignored",
            Self::AlreadyProcessed => "already_processed",
        }
    }
}

/// Handler for processing Yoco webhooks.
///
/// Verifies the delivery, skips ones already processed, and applies the
/// event to the booking ledger. Only verified payloads ever reach the ledger.
pub struct HandleYocoWebhookHandler {
    verifier: Arc<YocoWebhookVerifier>,
    ledger: Arc<dyn BookingPaymentLedger>,
    processed: Arc<dyn ProcessedWebhookStore>,
}

impl HandleYocoWebhookHandler {
    pub fn new(
        verifier: Arc<YocoWebhookVerifier>,
        ledger: Arc<dyn BookingPaymentLedger>,
        processed: Arc<dyn ProcessedWebhookStore>,
    ) -> Self {
        Self {
            verifier,
            ledger,
            processed,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleYocoWebhookCommand,
    ) -> Result<HandleYocoWebhookResult, WebhookError> {
        self.handle_at(cmd, chrono::Utc::now().timestamp()).await
    }

    /// Handles the delivery as if the current time were `now` (Unix seconds).
    pub async fn handle_at(
        &self,
        cmd: HandleYocoWebhookCommand,
        now: i64,
    ) -> Result<HandleYocoWebhookResult, WebhookError> {
        // 1. Verify signature and parse JSON
        let verified = self.verifier.verify(&cmd.envelope, now)?;

        // 2. Skip deliveries we have already applied
        if let Some(previous) = self.processed.find_by_webhook_id(&verified.id).await? {
            tracing::info!(
                webhook_id = %verified.id,
                event_id = %previous.event_id,
                previous_result = %previous.result,
                "Skipping already processed webhook"
            );
            return Ok(HandleYocoWebhookResult::AlreadyProcessed);
        }

        // 3. Parse event
        let event = YocoEvent::from_value(verified.payload).map_err(|e| {
            tracing::warn!(webhook_id = %verified.id, error = %e, "Verified webhook is not a Yoco event");
            e
        })?;

        // 4. Process based on event type
        let result = self.dispatch(&event).await.map_err(|e| {
            tracing::error!(
                webhook_id = %verified.id,
                event_id = %event.id,
                event_type = %event.event_type,
                error = %e,
                retryable = e.is_retryable(),
                "Webhook processing failed"
            );
            e
        })?;

        // 5. Record delivery
        let record = match &result {
            HandleYocoWebhookResult::Ignored { event_type } => WebhookDeliveryRecord::ignored(
                &verified.id,
                &event.id,
                &event.event_type,
                format!("unhandled event type {}", event_type),
            ),
            _ => WebhookDeliveryRecord::processed(&verified.id, &event.id, &event.event_type),
        };
        if self.processed.save(record).await? == SaveResult::AlreadyExists {
            tracing::debug!(webhook_id = %verified.id, "Concurrent delivery recorded first");
        }

        tracing::info!(
            webhook_id = %verified.id,
            event_id = %event.id,
            event_type = %event.event_type,
            outcome = result.outcome(),
            live = event.is_live(),
            "Webhook processed"
        );

        Ok(result)
    }

    async fn dispatch(&self, event: &YocoEvent) -> Result<HandleYocoWebhookResult, WebhookError> {
        match event.parsed_type() {
            YocoEventType::PaymentSucceeded => {
                let notice = PaymentNotice::from_event(event)?;
                self.ledger.mark_paid(&notice).await?;
                Ok(HandleYocoWebhookResult::BookingPaid {
                    booking_id: notice.booking_id,
                    payment_id: notice.provider_reference,
                })
            }
            YocoEventType::PaymentFailed => {
                let notice = PaymentNotice::from_event(event)?;
                self.ledger.mark_payment_failed(&notice).await?;
                Ok(HandleYocoWebhookResult::PaymentFailed {
                    booking_id: notice.booking_id,
                })
            }
            YocoEventType::RefundSucceeded => {
                let notice = PaymentNotice::from_event(event)?;
                self.ledger.record_refund(&notice).await?;
                Ok(HandleYocoWebhookResult::RefundRecorded {
                    booking_id: notice.booking_id,
                })
            }
            YocoEventType::RefundFailed => {
                // Nothing changed on the booking; support follows up from the dashboard
                Ok(HandleYocoWebhookResult::Acknowledged)
            }
            YocoEventType::Unknown => Ok(HandleYocoWebhookResult::Ignored {
                event_type: event.event_type.clone(),
            }),
        }
    }
}
