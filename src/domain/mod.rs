//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `webhook` - Authenticity and freshness checks for provider deliveries
//! - `payment` - Yoco event payloads and the booking payment notices derived from them

pub mod payment;
pub mod webhook;
