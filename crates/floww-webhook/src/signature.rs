//! HMAC signature helpers for verifying inbound webhook authenticity.
//!
//! Providers sign their webhook payloads differently: GitHub sends
//! `X-Hub-Signature-256: sha256=<hex>`, GitLab sends a bare secret token in
//! `X-Gitlab-Token`, Slack sends `X-Slack-Signature: v0=<hex>` over
//! `v0:{timestamp}:{body}`. These helpers cover the common HMAC-SHA256 shapes;
//! provider adapters compose them with their own header parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 of `payload` under `secret`.
pub fn sign_hex(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a bare hex-encoded HMAC-SHA256 signature in constant time.
pub fn verify_hex(secret: &[u8], payload: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Verifies a prefixed signature header such as `sha256=<hex>` (GitHub) or
/// `v0=<hex>` (Slack, after the caller has already built `v0:{ts}:{body}`).
pub fn verify_prefixed(secret: &[u8], payload: &[u8], header_value: &str, prefix: &str) -> bool {
    let Some(signature_hex) = header_value.strip_prefix(prefix) else {
        return false;
    };

    verify_hex(secret, payload, signature_hex)
}

/// Verifies a bare shared-secret token header (GitLab's `X-Gitlab-Token`),
/// which is an exact constant-time string comparison rather than an HMAC.
pub fn verify_token(secret: &[u8], header_value: &str) -> bool {
    let header_bytes = header_value.as_bytes();
    if header_bytes.len() != secret.len() {
        return false;
    }

    header_bytes
        .iter()
        .zip(secret)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_hex() {
        let secret = b"shared-secret";
        let payload = b"{\"event\":\"push\"}";

        let signature = sign_hex(secret, payload);
        assert!(verify_hex(secret, payload, &signature));
        assert!(!verify_hex(secret, payload, "deadbeef"));
    }

    #[test]
    fn test_verify_prefixed_github_style() {
        let secret = b"shared-secret";
        let payload = b"payload-bytes";
        let signature = sign_hex(secret, payload);
        let header = format!("sha256={signature}");

        assert!(verify_prefixed(secret, payload, &header, "sha256="));
        assert!(!verify_prefixed(secret, payload, "sha1=abcd", "sha256="));
    }

    #[test]
    fn test_verify_token() {
        assert!(verify_token(b"my-token", "my-token"));
        assert!(!verify_token(b"my-token", "wrong-token"));
        assert!(!verify_token(b"my-token", "my-token-extra"));
    }
}
