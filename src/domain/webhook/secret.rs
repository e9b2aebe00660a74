//! Webhook signing secret.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use super::errors::WebhookError;

/// Literal tag every provider-issued secret starts with.
pub const SECRET_PREFIX: &str = "whsec_";

/// Provider-issued signing secret (`whsec_<base64 key>`).
///
/// The raw string is held behind `secrecy` so it never ends up in `Debug`
/// output or logs. The key is decoded on demand; an unusable secret surfaces
/// as [`WebhookError::MisconfiguredSecret`].
#[derive(Debug, Clone)]
pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::new(secret.into()))
    }

    /// Decodes the HMAC key bytes.
    pub fn key_bytes(&self) -> Result<Vec<u8>, WebhookError> {
        let encoded = self
            .0
            .expose_secret()
            .strip_prefix(SECRET_PREFIX)
            .ok_or_else(|| {
                WebhookError::MisconfiguredSecret(format!(
                    "secret must start with {}",
                    SECRET_PREFIX
                ))
            })?;

        let key = STANDARD.decode(encoded).map_err(|e| {
            WebhookError::MisconfiguredSecret(format!("secret is not valid base64: {}", e))
        })?;

        if key.is_empty() {
            return Err(WebhookError::MisconfiguredSecret(
                "secret key is empty".to_string(),
            ));
        }

        Ok(key)
    }
}

impl From<SecretString> for WebhookSecret {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}
