//! Adapters - Implementations of ports and inbound interfaces.
//!
//! - `http` - Axum routes for provider webhooks
//! - `memory` - In-process ledger and delivery store

pub mod http;
pub mod memory;
