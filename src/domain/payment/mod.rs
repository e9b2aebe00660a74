//! Payment domain module.
//!
//! Yoco event payloads and the booking-level notices derived from them.

mod notice;
mod yoco_event;

pub use notice::PaymentNotice;
pub use yoco_event::{YocoEvent, YocoEventType, YocoMetadata, YocoPayment};
