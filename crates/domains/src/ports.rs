//! # Core Traits (Ports)
//!
//! Adapters implement these traits to be wired into the binary.
//! Missing entities are `Ok(None)`; `Err` is reserved for infrastructure
//! faults.

use async_trait::async_trait;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;
use uuid::Uuid;

use crate::models::{Account, Category, Page, SearchResult, SessionData, UserProfile};

/// Persistence contract for categories and pages.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    // Category operations
    async fn get_category(&self, slug: &str) -> anyhow::Result<Option<Category>>;
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;
    async fn top_categories(&self, limit: i64) -> anyhow::Result<Vec<Category>>;
    async fn create_category(&self, category: Category) -> anyhow::Result<()>;
    /// Adds one like; returns the new total, or None for an unknown slug.
    async fn like_category(&self, slug: &str) -> anyhow::Result<Option<i64>>;

    // Page operations
    async fn pages_for_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Page>>;
    async fn top_pages(&self, limit: i64) -> anyhow::Result<Vec<Page>>;
    async fn create_page(&self, page: Page) -> anyhow::Result<()>;
    async fn get_page(&self, id: Uuid) -> anyhow::Result<Option<Page>>;
    /// Atomically bumps the view counter; returns the page URL to redirect
    /// to, or None for an unknown id (in which case nothing is written).
    async fn record_page_visit(&self, id: Uuid) -> anyhow::Result<Option<String>>;
}

/// Persistence contract for accounts and their profiles.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn create_account(&self, account: Account) -> anyhow::Result<()>;
    async fn find_account(&self, username: &str) -> anyhow::Result<Option<Account>>;
    async fn save_profile(&self, profile: UserProfile) -> anyhow::Result<()>;
    async fn get_profile(&self, account_id: Uuid) -> anyhow::Result<Option<UserProfile>>;
    /// Accounts that completed a profile, with the profile attached.
    async fn list_profiles(&self) -> anyhow::Result<Vec<(Account, UserProfile)>>;
}

/// Server-side session state, keyed by the opaque token carried in the
/// session cookie.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> anyhow::Result<Option<SessionData>>;
    async fn save(&self, token: &str, data: SessionData) -> anyhow::Result<()>;
    async fn delete(&self, token: &str) -> anyhow::Result<()>;
}

/// Credential hashing contract.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait PasswordService: Send + Sync {
    async fn hash_password(&self, password: &str) -> anyhow::Result<String>;
    async fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Tamper-proofing for the session cookie value.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait TokenSigner: Send + Sync {
    fn sign(&self, token: &str) -> String;
    /// Returns the embedded token when the signature checks out.
    fn verify(&self, signed: &str) -> Option<String>;
}

/// Outbound contract for the external search API.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, size: usize) -> anyhow::Result<Vec<SearchResult>>;
}

/// Storage contract for uploaded profile pictures.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media id for the profile record.
    async fn save_picture(&self, data: Vec<u8>, content_type: &str) -> anyhow::Result<String>;
    /// Returns the public URL for a stored media id.
    fn picture_url(&self, media_id: &str) -> String;
}
