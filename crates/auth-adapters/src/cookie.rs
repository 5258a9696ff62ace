//! HMAC-SHA256 signing for the session cookie value.
//!
//! The cookie carries `token.signature`; the token half is the session
//! store key. A client that edits either half fails verification and is
//! treated as having no session.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use domains::ports::TokenSigner;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

pub struct HmacTokenSigner {
    key: Vec<u8>,
}

impl HmacTokenSigner {
    /// Accepts the signing secret (e.g., from configuration).
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn signature(&self, token: &str) -> String {
        // new_from_slice accepts any key length for HMAC.
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

impl TokenSigner for HmacTokenSigner {
    fn sign(&self, token: &str) -> String {
        format!("{token}.{}", self.signature(token))
    }

    fn verify(&self, signed: &str) -> Option<String> {
        let (token, signature) = signed.rsplit_once('.')?;
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(token.as_bytes());
        let expected = URL_SAFE_NO_PAD.decode(signature).ok()?;
        // Constant-time comparison via the Mac verify path.
        if mac.verify_slice(&expected).is_ok() {
            Some(token.to_string())
        } else {
            debug!("session cookie failed signature verification");
            None
        }
    }
}
