//! Signature header tokenizer and HMAC-SHA256 primitives.
//!
//! Signed content is `{id}.{timestamp}.{body}`; the signature is the
//! base64-encoded HMAC-SHA256 of that content under the decoded secret key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// One signature value extracted from the `webhook-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCandidate {
    /// Version tag (`v1`), absent for bare tokens.
    pub version: Option<String>,
    /// Base64 signature value.
    pub value: String,
}

/// Parsed `webhook-signature` header.
///
/// Format: space-separated tokens, each `version,value` or a bare `value`.
/// Several tokens appear while the provider rotates keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureHeader {
    candidates: Vec<SignatureCandidate>,
}

impl SignatureHeader {
    /// Tokenizes a header value. Tokens with an empty value are skipped.
    pub fn parse(header: &str) -> Self {
        let candidates = header
            .split_ascii_whitespace()
            .filter_map(parse_token)
            .collect();

        Self { candidates }
    }

    pub fn candidates(&self) -> &[SignatureCandidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the first candidate equal to `expected`.
    ///
    /// Every candidate is compared in constant time, and the loop does not
    /// stop early, so the work done does not depend on which one matched.
    pub fn find_match(&self, expected: &str) -> Option<&SignatureCandidate> {
        let mut matched = None;
        for candidate in &self.candidates {
            if constant_time_compare(candidate.value.as_bytes(), expected.as_bytes())
                && matched.is_none()
            {
                matched = Some(candidate);
            }
        }
        matched
    }
}

fn parse_token(token: &str) -> Option<SignatureCandidate> {
    let (version, value) = match token.split_once(',') {
        Some((version, value)) => (Some(version), value),
        None => (None, token),
    };

    if value.is_empty() {
        return None;
    }

    Some(SignatureCandidate {
        version: version.filter(|v| !v.is_empty()).map(str::to_string),
        value: value.to_string(),
    })
}

/// Computes the base64 HMAC-SHA256 signature for a delivery.
pub fn compute_signature(
    key: &[u8],
    id: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| WebhookError::MisconfiguredSecret(e.to_string()))?;
    mac.update(id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Performs constant-time comparison of two byte slices.
///
/// Length is not secret (every valid signature has the same length), so an
/// early return on mismatched length leaks nothing useful.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Line-ending rewrite applied to the body before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyVariant {
    /// Raw bytes as received.
    Exact,
    /// Every `\r\n` rewritten to `\n`.
    LfNormalized,
    /// Every line ending rewritten to `\r\n`.
    CrlfNormalized,
}

impl BodyVariant {
    /// Variants tried after the exact body fails to match.
    pub const FALLBACKS: [BodyVariant; 2] = [BodyVariant::LfNormalized, BodyVariant::CrlfNormalized];

    /// Rewrites `body`, or returns `None` when the rewrite would not change it.
    pub fn apply(self, body: &[u8]) -> Option<Vec<u8>> {
        let rewritten = match self {
            BodyVariant::Exact => return None,
            BodyVariant::LfNormalized => normalize_to_lf(body),
            BodyVariant::CrlfNormalized => normalize_to_crlf(body),
        };
        (rewritten != body).then_some(rewritten)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyVariant::Exact => "exact",
            BodyVariant::LfNormalized => "lf",
            BodyVariant::CrlfNormalized => "crlf",
        }
    }
}

fn normalize_to_lf(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut iter = body.iter().peekable();
    while let Some(&byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(byte);
    }
    out
}

fn normalize_to_crlf(body: &[u8]) -> Vec<u8> {
    let lf = normalize_to_lf(body);
    let mut out = Vec::with_capacity(lf.len() + lf.len() / 8);
    for byte in lf {
        if byte == b'\n' {
            out.push(b'\r');
        }
        out.push(byte);
    }
    out
}
