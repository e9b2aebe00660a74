//! Webhook verification domain module.
//!
//! Decides whether an inbound payment-provider delivery is authentic and
//! fresh before anything in the application trusts it.
//!
//! # Module Structure
//!
//! - `envelope` - Delivery headers and raw body as received
//! - `secret` - `whsec_` signing secret
//! - `signature` - Header tokenizer, HMAC computation, constant-time comparison
//! - `verifier` - Verification pipeline (presence, freshness, signature, payload)
//! - `errors` - Rejection taxonomy with HTTP status mapping

mod envelope;
mod errors;
mod secret;
mod signature;
mod verifier;

pub use envelope::{
    WebhookEnvelope, WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
};
pub use errors::WebhookError;
pub use secret::{WebhookSecret, SECRET_PREFIX};
pub use signature::{
    compute_signature, constant_time_compare, BodyVariant, SignatureCandidate, SignatureHeader,
};
pub use verifier::{SignatureMatch, VerifiedWebhook, YocoWebhookVerifier, DEFAULT_TOLERANCE_SECS};

#[cfg(test)]
pub use verifier::compute_test_header;
