//! HMAC-SHA256 signature verification for inbound payment-provider webhooks.
//!
//! The provider signs the raw request body with a shared secret and sends the
//! hex digest in a signature header. Verification is constant-time via the
//! `hmac` crate's `verify_slice`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex HMAC-SHA256 signature of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Verify a hex signature against the raw body. Returns `false` for malformed
/// hex as well as digest mismatches.
pub fn verify(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Some(expected) = decode_hex(signature_hex) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify() {
        let secret = "whsec_test";
        let body = br#"{"type":"invoice.paid","id":"evt_1"}"#;
        let sig = sign(secret, body);
        assert!(verify(secret, body, &sig));
    }

    #[test]
    fn tampered_body_fails() {
        let secret = "whsec_test";
        let sig = sign(secret, b"original");
        assert!(!verify(secret, b"tampered", &sig));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = sign("secret-a", b"body");
        assert!(!verify("secret-b", b"body", &sig));
    }

    #[test]
    fn malformed_hex_fails_closed() {
        assert!(!verify("secret", b"body", "not-hex"));
        assert!(!verify("secret", b"body", "abc"));
    }
}
