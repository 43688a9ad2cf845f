//! Deterministic hashing utilities.
//!
//! Fingerprints identify a record by the SHA-256 of its canonical bytes. They
//! appear in logs, CLI summaries and verification reports; they are not part of
//! the artifact itself.

use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(bytes);
    h.finalize().into()
}

/// SHA-256 of raw bytes as lowercase hex.
pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_bytes_stable() {
        assert_eq!(hash_bytes_hex(b"abc"), hash_bytes_hex(b"abc"));
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            hash_bytes_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
