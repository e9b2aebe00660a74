//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `BookingPaymentLedger` - Applies verified payment events to bookings
//! - `ProcessedWebhookStore` - Webhook delivery idempotency tracking

mod booking_payment_ledger;
mod error;
mod processed_webhook_store;

pub use booking_payment_ledger::BookingPaymentLedger;
pub use error::PortError;
pub use processed_webhook_store::{ProcessedWebhookStore, SaveResult, WebhookDeliveryRecord};
