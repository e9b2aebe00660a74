//! In-memory implementations of the webhook ports.
//!
//! Used by the development server and by tests.

mod booking_ledger;
mod processed_webhook_store;

pub use booking_ledger::{BookingPaymentEntry, BookingPaymentStatus, InMemoryBookingLedger};
pub use processed_webhook_store::InMemoryProcessedWebhookStore;
