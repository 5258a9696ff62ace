//! Session cookie plumbing.
//!
//! The cookie value is an HMAC-signed opaque token; all session content
//! lives server-side behind the [`SessionStore`] port. A bad or missing
//! signature simply means a fresh anonymous session.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use domains::models::SessionData;
use domains::ports::TokenSigner;
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "rango_session";

/// A loaded (or freshly minted) session for the current request.
pub struct SessionHandle {
    pub token: String,
    pub data: SessionData,
}

pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        })
}

/// Resolves the request's session, falling back to a fresh anonymous one
/// when the cookie is absent, forged, or refers to expired state.
pub async fn open_session(state: &AppState, headers: &HeaderMap) -> anyhow::Result<SessionHandle> {
    if let Some(signed) = cookie_value(headers, SESSION_COOKIE) {
        if let Some(token) = state.signer.verify(&signed) {
            let data = state.sessions.load(&token).await?.unwrap_or_default();
            return Ok(SessionHandle { token, data });
        }
    }
    Ok(SessionHandle {
        token: Uuid::new_v4().simple().to_string(),
        data: SessionData::default(),
    })
}

/// Appends the signed session cookie to a response.
pub fn set_session_cookie(response: &mut Response, signer: &dyn TokenSigner, token: &str) {
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        signer.sign(token)
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
}

/// Expires the session cookie on the client.
pub fn clear_session_cookie(response: &mut Response) {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
}
