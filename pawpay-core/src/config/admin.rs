//! Admin configuration.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Admin configuration for authenticated read endpoints.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Argon2 hash of the admin secret.
    pub secret_hash: String,
}

impl AdminConfig {
    /// Create a new AdminConfig from an already-hashed secret.
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    /// Verify a presented plaintext secret against the stored hash.
    pub fn verify(&self, presented: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.secret_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::{SaltString, rand_core::OsRng};

    #[test]
    fn verify_accepts_matching_secret_only() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"keep-me-safe", &salt)
            .unwrap()
            .to_string();
        let config = AdminConfig::new(hash);
        assert!(config.verify("keep-me-safe"));
        assert!(!config.verify("wrong"));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let config = AdminConfig::new("not-a-hash".to_string());
        assert!(!config.verify("anything"));
    }
}
