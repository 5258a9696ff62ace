//! # Domain Models
//!
//! These structs represent the core entities of Rango.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A browsable category of pages (e.g., "Python", "Django").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier derived from the name, unique across categories.
    pub slug: String,
    pub views: i64,
    pub likes: i64,
}

/// An external link filed under a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub url: String,
    /// Incremented on every tracked click-through; no deduplication.
    pub views: i64,
}

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// PHC-format hash produced by the auth adapter. Never the raw password.
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Extra fields attached one-to-one to an [`Account`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub account_id: Uuid,
    pub website: String,
    /// Media id of the uploaded picture, if any.
    pub picture: Option<String>,
}

/// Per-client session state, keyed by an opaque token in a signed cookie.
///
/// The visit fields keep the textual wire encodings of the original cookies:
/// `visits` is a decimal string, `last_visit` is `"YYYY-MM-DD HH:MM:SS"` with
/// any trailing fractional suffix discarded when parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub account: Option<Uuid>,
    pub visits: Option<String>,
    pub last_visit: Option<String>,
}

impl SessionData {
    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }
}

/// One hit returned by the external search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    /// At most 200 characters of the source text.
    pub summary: String,
}
