//! Shared SHA-256 hex digest utilities.
//!
//! Used by the certificate generator (document fingerprints), the auth layer
//! (refresh-token hashes), and the webhook verifier.

use sha2::{Digest, Sha256};

/// Length of the truncated document fingerprint embedded on certificate pages.
pub const FINGERPRINT_LEN: usize = 16;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Truncated SHA-256 digest of a document's original bytes.
///
/// This is a human-readable reference fingerprint printed on the certificate
/// page, not a verifiable cryptographic seal: it is computed over the source
/// bytes *before* signature overlays are applied.
pub fn document_fingerprint(data: &[u8]) -> String {
    let mut digest = sha256_hex(data);
    digest.truncate(FINGERPRINT_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn consistent_output() {
        let data = b"hello world";
        assert_eq!(sha256_hex(data), sha256_hex(data));
        assert_eq!(sha256_hex(data).len(), 64);
    }

    #[test]
    fn fingerprint_is_digest_prefix() {
        let data = b"contract bytes";
        let full = sha256_hex(data);
        let fp = document_fingerprint(data);
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(full.starts_with(&fp));
    }
}
