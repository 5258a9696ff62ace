//! State shared across all request handlers.

use std::sync::Arc;

use domains::ports::{MediaStore, SessionStore, TokenSigner};
use services::{AccountService, ContentService, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub accounts: Arc<AccountService>,
    pub search: Arc<SearchService>,
    pub sessions: Arc<dyn SessionStore>,
    pub signer: Arc<dyn TokenSigner>,
    pub media: Arc<dyn MediaStore>,
}
