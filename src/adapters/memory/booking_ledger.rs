//! In-memory booking payment ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::payment::PaymentNotice;
use crate::ports::{BookingPaymentLedger, PortError};

/// Payment state of a booking as seen by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingPaymentStatus {
    #[default]
    AwaitingPayment,
    Paid,
    PaymentFailed,
    Refunded,
}

/// Ledger entry for one booking.
///
/// `status` is always derived from the totals, so Yoco events may arrive in
/// any order and the entry still agrees with itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPaymentEntry {
    pub status: BookingPaymentStatus,
    pub paid_cents: i64,
    pub refunded_cents: i64,
    pub failed_attempts: u32,
    pub provider_reference: Option<String>,
    /// Event ID to the time it was applied.
    applied_events: HashMap<String, DateTime<Utc>>,
}

impl BookingPaymentEntry {
    fn refresh_status(&mut self) {
        self.status = if self.paid_cents > 0 && self.refunded_cents >= self.paid_cents {
            BookingPaymentStatus::Refunded
        } else if self.paid_cents > 0 {
            BookingPaymentStatus::Paid
        } else if self.failed_attempts > 0 {
            BookingPaymentStatus::PaymentFailed
        } else {
            BookingPaymentStatus::AwaitingPayment
        };
    }
}

/// Ledger kept in process memory.
///
/// In `strict` mode only bookings registered with [`register_booking`]
/// exist and anything else is `NotFound`; otherwise entries are created on
/// first use, which suits a standalone development server.
///
/// [`register_booking`]: InMemoryBookingLedger::register_booking
#[derive(Default)]
pub struct InMemoryBookingLedger {
    entries: RwLock<HashMap<String, BookingPaymentEntry>>,
    strict: bool,
}

impl InMemoryBookingLedger {
    /// Creates a ledger that accepts any booking ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger that only knows registered bookings.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub async fn register_booking(&self, booking_id: impl Into<String>) {
        self.entries
            .write()
            .await
            .entry(booking_id.into())
            .or_default();
    }

    /// Snapshot of a booking's entry.
    pub async fn entry(&self, booking_id: &str) -> Option<BookingPaymentEntry> {
        self.entries.read().await.get(booking_id).cloned()
    }

    /// Forgets event IDs applied before `cutoff`. Returns the count removed.
    ///
    /// A replay of a forgotten event would be applied again, so the cutoff
    /// must be older than Yoco's redelivery horizon.
    pub async fn forget_events_before(&self, cutoff: DateTime<Utc>) -> u64 {
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for entry in entries.values_mut() {
            let before = entry.applied_events.len();
            entry.applied_events.retain(|_, applied_at| *applied_at >= cutoff);
            removed += (before - entry.applied_events.len()) as u64;
        }
        removed
    }

    /// Applies `update` once per event; replays of the same event are no-ops.
    async fn apply(
        &self,
        notice: &PaymentNotice,
        update: impl FnOnce(&mut BookingPaymentEntry),
    ) -> Result<(), PortError> {
        self.apply_at(notice, Utc::now(), update).await
    }

    async fn apply_at(
        &self,
        notice: &PaymentNotice,
        applied_at: DateTime<Utc>,
        update: impl FnOnce(&mut BookingPaymentEntry),
    ) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;

        if self.strict && !entries.contains_key(&notice.booking_id) {
            return Err(PortError::NotFound(notice.booking_id.clone()));
        }

        let entry = entries.entry(notice.booking_id.clone()).or_default();
        if entry.applied_events.contains_key(&notice.event_id) {
            return Ok(());
        }
        entry.applied_events.insert(notice.event_id.clone(), applied_at);
        update(entry);
        entry.refresh_status();
        Ok(())
    }
}

#[async_trait]
impl BookingPaymentLedger for InMemoryBookingLedger {
    async fn mark_paid(&self, notice: &PaymentNotice) -> Result<(), PortError> {
        self.apply(notice, |entry| {
            entry.paid_cents += notice.amount_cents;
            entry.provider_reference = Some(notice.provider_reference.clone());
        })
        .await
    }

    async fn mark_payment_failed(&self, notice: &PaymentNotice) -> Result<(), PortError> {
        self.apply(notice, |entry| entry.failed_attempts += 1).await
    }

    async fn record_refund(&self, notice: &PaymentNotice) -> Result<(), PortError> {
        self.apply(notice, |entry| entry.refunded_cents += notice.amount_cents)
            .await
    }
}
