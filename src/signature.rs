// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Webhook signature verification.
//!
//! GitHub sends `X-Hub-Signature-256: sha256=<hex>` where `<hex>` is the
//! HMAC-SHA256 of the raw request body keyed with the webhook secret.
//!
//! ## Security
//!
//! An empty or unset secret turns verification **off**: every delivery is
//! accepted. This is an explicit operator opt-out for local development and
//! must never be used on a publicly reachable deployment.

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify `header_signature` against the HMAC-SHA256 of `raw_body`.
///
/// Returns `true` unconditionally when `shared_secret` is empty. Otherwise the
/// header must start with the literal `sha256=` prefix and its suffix must
/// equal the lowercase hex digest; the comparison is constant time.
pub fn verify(raw_body: &[u8], header_signature: &str, shared_secret: &[u8]) -> bool {
    if shared_secret.is_empty() {
        return true;
    }

    let Some(received) = header_signature.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(shared_secret) else {
        return false;
    };
    mac.update(raw_body);
    let expected = hex::encode(mac.finalize().into_bytes());

    constant_time_eq(expected.as_bytes(), received.as_bytes())
}

/// Holds the configured webhook secret for the lifetime of the server.
#[derive(Clone, Default)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// A verifier that accepts every delivery.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Check a delivery. A missing header only passes when verification is off.
    pub fn verify(&self, raw_body: &[u8], header_signature: Option<&str>) -> bool {
        if !self.is_enabled() {
            return true;
        }
        match header_signature {
            Some(sig) => verify(raw_body, sig, &self.secret),
            None => false,
        }
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Header value GitHub would send for `body` signed with `secret`.
    pub(crate) fn sign(secret: &[u8], body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn github_documented_example_verifies() {
        // Example from GitHub's "Validating webhook deliveries" guide.
        let sig = "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17";
        assert!(verify(b"Hello, World!", sig, b"It's a Secret to Everybody"));
    }

    #[test]
    fn valid_signature_passes() {
        let sig = sign(b"test-secret", b"{\"action\":\"created\"}");
        assert!(verify(b"{\"action\":\"created\"}", &sig, b"test-secret"));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = sign(b"correct-secret", b"body");
        assert!(!verify(b"body", &sig, b"wrong-secret"));
    }

    #[test]
    fn any_body_byte_mutation_fails() {
        let body = b"{\"action\":\"created\"}".to_vec();
        let sig = sign(b"secret", &body);
        for i in 0..body.len() {
            let mut tampered = body.clone();
            tampered[i] ^= 0x01;
            assert!(!verify(&tampered, &sig, b"secret"), "byte {i}");
        }
    }

    #[test]
    fn any_signature_character_mutation_fails() {
        let sig = sign(b"secret", b"body");
        let prefix_len = SIGNATURE_PREFIX.len();
        for i in prefix_len..sig.len() {
            let mut chars: Vec<char> = sig.chars().collect();
            chars[i] = if chars[i] == '0' { '1' } else { '0' };
            let tampered: String = chars.into_iter().collect();
            assert!(!verify(b"body", &tampered, b"secret"), "position {i}");
        }
    }

    #[test]
    fn missing_or_malformed_prefix_fails() {
        let sig = sign(b"secret", b"body");
        let raw_hex = sig.strip_prefix("sha256=").unwrap();
        assert!(!verify(b"body", raw_hex, b"secret"));
        assert!(!verify(b"body", &format!("SHA256={raw_hex}"), b"secret"));
        assert!(!verify(b"body", &format!("sha1={raw_hex}"), b"secret"));
        assert!(!verify(b"body", "", b"secret"));
    }

    #[test]
    fn truncated_signature_fails() {
        let sig = sign(b"secret", b"body");
        assert!(!verify(b"body", &sig[..sig.len() - 1], b"secret"));
        assert!(!verify(b"body", "sha256=", b"secret"));
    }

    #[test]
    fn empty_secret_accepts_anything() {
        assert!(verify(b"body", "garbage", b""));
        assert!(verify(b"body", "", b""));
    }

    #[test]
    fn verifier_requires_header_when_enabled() {
        let verifier = WebhookVerifier::new("secret");
        let sig = sign(b"secret", b"body");
        assert!(verifier.is_enabled());
        assert!(verifier.verify(b"body", Some(&sig)));
        assert!(!verifier.verify(b"body", None));
        assert!(!verifier.verify(b"other", Some(&sig)));
    }

    #[test]
    fn disabled_verifier_accepts_missing_header() {
        let verifier = WebhookVerifier::disabled();
        assert!(!verifier.is_enabled());
        assert!(verifier.verify(b"body", None));
        assert!(verifier.verify(b"body", Some("sha256=00")));
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", WebhookVerifier::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
