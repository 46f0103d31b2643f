use sha2::{Digest, Sha256};

/// One-way digest of a password using SHA-256, hex encoded.
///
/// The store keeps this digest instead of the plaintext, and login matches on
/// the (username, digest) pair, so the digest must be deterministic.
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_determinism() {
        let d1 = digest_password("my-secure-password");
        let d2 = digest_password("my-secure-password");
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_different_passwords_differ() {
        assert_ne!(digest_password("password-a"), digest_password("password-b"));
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = digest_password("anything");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_password_digests() {
        // An empty password still produces a digest; it just matches no
        // stored account unless one was created with an empty password.
        assert_eq!(
            digest_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
