//! Form payloads for the HTML views.
//!
//! Field-level validation with user-facing messages lives in `services`;
//! these structs only carry the submitted values.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

/// `/goto` takes its page id as a query parameter; anything unparseable is
/// treated the same as an absent id.
#[derive(Debug, Deserialize)]
pub struct GotoParams {
    pub page_id: Option<String>,
}
