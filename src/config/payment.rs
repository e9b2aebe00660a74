//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::{WebhookSecret, YocoWebhookVerifier, DEFAULT_TOLERANCE_SECS};

/// Payment configuration (Yoco)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Yoco webhook signing secret (`whsec_...`)
    pub yoco_webhook_secret: SecretString,

    /// Allowed clock skew between Yoco and us, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Retry signature matching with normalized line endings
    #[serde(default = "default_line_ending_fallback")]
    pub line_ending_fallback: bool,
}

impl PaymentConfig {
    pub fn new(yoco_webhook_secret: impl Into<String>) -> Self {
        Self {
            yoco_webhook_secret: SecretString::new(yoco_webhook_secret.into()),
            webhook_tolerance_secs: default_webhook_tolerance(),
            line_ending_fallback: default_line_ending_fallback(),
        }
    }

    /// Builds the verifier for incoming Yoco webhooks.
    pub fn webhook_verifier(&self) -> YocoWebhookVerifier {
        YocoWebhookVerifier::new(WebhookSecret::from(self.yoco_webhook_secret.clone()))
            .with_tolerance(self.webhook_tolerance_secs)
            .with_line_ending_fallback(self.line_ending_fallback)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.yoco_webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("YOCO_WEBHOOK_SECRET"));
        }

        // Decode now so a broken secret fails at startup, not per request
        WebhookSecret::from(self.yoco_webhook_secret.clone())
            .key_bytes()
            .map_err(|e| ValidationError::InvalidYocoWebhookSecret(e.to_string()))?;

        if !(1..=3600).contains(&self.webhook_tolerance_secs) {
            return Err(ValidationError::InvalidWebhookTolerance);
        }

        Ok(())
    }
}

fn default_webhook_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_line_ending_fallback() -> bool {
    true
}
