//! # auth-adapters
//!
//! Argon2-based credential hashing and HMAC cookie signing.

pub mod cookie;
pub mod password;

pub use cookie::HmacTokenSigner;
pub use password::Argon2Passwords;
