//! Rentio payments service
//!
//! Verifies Yoco payment webhooks and applies the trusted events to Rentio
//! bookings.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
