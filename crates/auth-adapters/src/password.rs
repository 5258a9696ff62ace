//! Argon2 implementation of `PasswordService`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use domains::ports::PasswordService;

#[derive(Default)]
pub struct Argon2Passwords;

impl Argon2Passwords {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PasswordService for Argon2Passwords {
    async fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?;
        Ok(hash.to_string())
    }

    /// An unparseable stored hash verifies as false rather than erroring;
    /// the caller treats it like any other bad credential.
    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let passwords = Argon2Passwords::new();
        let hash = passwords.hash_password("wubble123").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(passwords.verify_password("wubble123", &hash).await);
        assert!(!passwords.verify_password("wobble123", &hash).await);
    }

    #[tokio::test]
    async fn garbage_hash_never_verifies() {
        let passwords = Argon2Passwords::new();
        assert!(!passwords.verify_password("anything", "not-a-phc-string").await);
    }
}
