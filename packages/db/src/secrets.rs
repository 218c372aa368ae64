//! Password digests and random tokens.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Random 32-byte hex session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Random 16-byte hex salt.
#[must_use]
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Hex SHA-256 of `salt` followed by `password`.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Compare in constant time with respect to the digest contents.
pub fn verify_password(salt: &str, password: &str, digest: &str) -> bool {
    let candidate = hash_password(salt, password);
    candidate.len() == digest.len()
        && candidate
            .bytes()
            .zip(digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        assert_eq!(generate_salt().len(), 32);
    }

    #[test]
    fn password_digest_depends_on_salt() {
        let digest = hash_password("salt-a", "secret1");
        assert_eq!(digest.len(), 64);
        assert!(verify_password("salt-a", "secret1", &digest));
        assert!(!verify_password("salt-b", "secret1", &digest));
        assert!(!verify_password("salt-a", "secret2", &digest));
    }
}
