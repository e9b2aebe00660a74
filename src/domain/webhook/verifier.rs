//! Yoco webhook signature verification.
//!
//! Yoco signs deliveries following the Standard Webhooks scheme: HMAC-SHA256
//! over `{webhook-id}.{webhook-timestamp}.{body}` keyed with the base64 part
//! of a `whsec_` secret. Timestamp validation bounds the replay window.

use serde_json::Value;

use super::envelope::WebhookEnvelope;
use super::errors::WebhookError;
use super::secret::WebhookSecret;
use super::signature::{compute_signature, BodyVariant, SignatureCandidate, SignatureHeader};

/// Maximum allowed distance between the delivery timestamp and now (3 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 180;

/// Which candidate and which body rewrite produced the accepted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatch {
    pub version: Option<String>,
    pub body_variant: BodyVariant,
}

impl SignatureMatch {
    fn new(candidate: &SignatureCandidate, body_variant: BodyVariant) -> Self {
        Self {
            version: candidate.version.clone(),
            body_variant,
        }
    }
}

/// A delivery that passed verification, with its body parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedWebhook {
    /// Delivery ID (`webhook-id`).
    pub id: String,
    /// Signing time in Unix seconds.
    pub timestamp: i64,
    /// Trusted event payload.
    pub payload: Value,
    pub matched: SignatureMatch,
}

/// Verifier for Yoco webhook signatures.
///
/// Holds only immutable configuration, so one instance can be shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct YocoWebhookVerifier {
    secret: WebhookSecret,
    tolerance_secs: i64,
    line_ending_fallback: bool,
}

impl YocoWebhookVerifier {
    /// Creates a verifier with the default 180 second tolerance and the
    /// line-ending fallback enabled.
    pub fn new(secret: WebhookSecret) -> Self {
        Self {
            secret,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            line_ending_fallback: true,
        }
    }

    /// Sets the timestamp tolerance.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Enables or disables retrying with line-ending normalized bodies.
    ///
    /// Some proxies rewrite line endings in transit. The exact-bytes
    /// signature is always tried first; this only adds the rewritten
    /// bodies as a compatibility shim.
    pub fn with_line_ending_fallback(mut self, enabled: bool) -> Self {
        self.line_ending_fallback = enabled;
        self
    }

    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    /// Verifies a delivery against the current wall clock.
    pub fn verify_now(&self, envelope: &WebhookEnvelope) -> Result<VerifiedWebhook, WebhookError> {
        self.verify(envelope, chrono::Utc::now().timestamp())
    }

    /// Verifies the webhook signature and parses the payload.
    ///
    /// # Verification Steps
    ///
    /// 1. Check that id, timestamp and signature are present
    /// 2. Validate the timestamp is within `tolerance_secs` of `now`
    /// 3. Decode the signing key from the secret
    /// 4. Compute the expected signature and compare every candidate
    ///    (constant-time), retrying line-ending variants if enabled
    /// 5. Parse the body as JSON
    ///
    /// # Errors
    ///
    /// - `MalformedRequest` - Missing header or non-integer timestamp
    /// - `StaleOrFutureTimestamp` - Timestamp outside the tolerance window
    /// - `MisconfiguredSecret` - Secret lacks the `whsec_` prefix or is not base64
    /// - `InvalidSignature` - No candidate matched
    /// - `UnparseableBody` - Signature valid, body is not JSON
    pub fn verify(
        &self,
        envelope: &WebhookEnvelope,
        now: i64,
    ) -> Result<VerifiedWebhook, WebhookError> {
        // 1. Presence
        envelope.check_presence().map_err(|e| {
            tracing::warn!(error = %e, "Rejecting webhook with missing headers");
            e
        })?;

        // 2. Freshness
        let timestamp = envelope.timestamp_secs().map_err(|e| {
            tracing::warn!(webhook_id = %envelope.id, error = %e, "Rejecting webhook");
            e
        })?;
        self.validate_timestamp(&envelope.id, timestamp, now)?;

        // 3. Key
        let key = self.secret.key_bytes().map_err(|e| {
            tracing::error!(error = %e, "Webhook secret is unusable - no webhook can be verified");
            e
        })?;

        // 4. Signature
        let header = SignatureHeader::parse(&envelope.signature_header);
        let matched = match self.match_signature(&key, envelope, &header)? {
            Some(matched) => matched,
            None => {
                tracing::warn!(
                    webhook_id = %envelope.id,
                    candidates = header.candidates().len(),
                    "Webhook signature verification failed"
                );
                return Err(WebhookError::InvalidSignature);
            }
        };

        // 5. Payload
        let payload: Value = serde_json::from_slice(&envelope.body).map_err(|e| {
            tracing::warn!(
                webhook_id = %envelope.id,
                error = %e,
                "Webhook signature valid but body is not JSON"
            );
            WebhookError::UnparseableBody(e.to_string())
        })?;

        tracing::debug!(
            webhook_id = %envelope.id,
            version = ?matched.version,
            body_variant = matched.body_variant.as_str(),
            "Webhook signature verified"
        );

        Ok(VerifiedWebhook {
            id: envelope.id.clone(),
            timestamp,
            payload,
            matched,
        })
    }

    /// Validates that the timestamp is within the tolerance window.
    fn validate_timestamp(&self, webhook_id: &str, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let distance = now.abs_diff(timestamp);

        if distance > self.tolerance_secs.unsigned_abs() {
            let age_secs = now.saturating_sub(timestamp);
            tracing::warn!(
                webhook_id = %webhook_id,
                event_timestamp = timestamp,
                current_time = now,
                age_secs,
                "Webhook timestamp outside tolerance - possible replay"
            );
            return Err(WebhookError::StaleOrFutureTimestamp { age_secs });
        }

        Ok(())
    }

    fn match_signature(
        &self,
        key: &[u8],
        envelope: &WebhookEnvelope,
        header: &SignatureHeader,
    ) -> Result<Option<SignatureMatch>, WebhookError> {
        if header.is_empty() {
            tracing::debug!(webhook_id = %envelope.id, "No usable signature tokens in header");
            return Ok(None);
        }

        let expected = compute_signature(key, &envelope.id, &envelope.timestamp, &envelope.body)?;
        if let Some(candidate) = header.find_match(&expected) {
            return Ok(Some(SignatureMatch::new(candidate, BodyVariant::Exact)));
        }

        if !self.line_ending_fallback {
            return Ok(None);
        }

        for variant in BodyVariant::FALLBACKS {
            let Some(body) = variant.apply(&envelope.body) else {
                continue;
            };
            let expected = compute_signature(key, &envelope.id, &envelope.timestamp, &body)?;
            if let Some(candidate) = header.find_match(&expected) {
                tracing::warn!(
                    webhook_id = %envelope.id,
                    body_variant = variant.as_str(),
                    "Webhook signature matched only after line-ending normalization"
                );
                return Ok(Some(SignatureMatch::new(candidate, variant)));
            }
        }

        Ok(None)
    }
}

/// Signs a delivery the way the provider does, for test fixtures.
#[cfg(test)]
pub fn compute_test_header(secret: &str, id: &str, timestamp: &str, body: &[u8]) -> String {
    let key = WebhookSecret::new(secret).key_bytes().unwrap();
    format!("v1,{}", compute_signature(&key, id, timestamp, body).unwrap())
}
