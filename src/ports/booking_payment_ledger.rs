//! BookingPaymentLedger port - Where trusted payment events land.
//!
//! The booking/payment tables themselves belong to the rest of the
//! marketplace; this port is the narrow surface the webhook pipeline needs.
//! Implementations must be idempotent per `PaymentNotice::event_id`, since
//! Yoco redelivers on any non-2xx response.

use async_trait::async_trait;

use super::error::PortError;
use crate::domain::payment::PaymentNotice;

/// Port for applying payment outcomes to bookings.
#[async_trait]
pub trait BookingPaymentLedger: Send + Sync {
    /// Marks the booking as paid.
    ///
    /// Returns `PortError::NotFound` if the booking does not exist.
    async fn mark_paid(&self, notice: &PaymentNotice) -> Result<(), PortError>;

    /// Records a failed payment attempt against the booking.
    async fn mark_payment_failed(&self, notice: &PaymentNotice) -> Result<(), PortError>;

    /// Records a completed refund against the booking.
    async fn record_refund(&self, notice: &PaymentNotice) -> Result<(), PortError>;
}
