//! Askama template definitions.
//!
//! Every view extends `base.html`, so every struct carries the shared
//! context: the page title, the sidebar category list, and whether the
//! session is authenticated.

use askama::Template;
use domains::models::{Category, Page, SearchResult};
use domains::FieldError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub categories: &'a [Category],
    pub pages: &'a [Page],
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub visits: u32,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub category: Option<&'a Category>,
    pub pages: &'a [Page],
}

#[derive(Template)]
#[template(path = "add_category.html")]
pub struct AddCategoryTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub name: &'a str,
    pub errors: &'a [FieldError],
}

#[derive(Template)]
#[template(path = "add_page.html")]
pub struct AddPageTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub category: Option<&'a Category>,
    pub page_title: &'a str,
    pub page_url: &'a str,
    pub errors: &'a [FieldError],
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub registered: bool,
    pub username: &'a str,
    pub email: &'a str,
    pub website: &'a str,
    pub errors: &'a [FieldError],
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub username: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "restricted.html")]
pub struct RestrictedTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub query: &'a str,
    pub results: &'a [SearchResult],
}

/// Row shape shared by the profile pages.
pub struct ProfileRow {
    pub username: String,
    pub email: String,
    pub website: String,
    pub picture_url: Option<String>,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub profile: &'a ProfileRow,
}

#[derive(Template)]
#[template(path = "profile_list.html")]
pub struct ProfileListTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub profiles: &'a [ProfileRow],
}

#[derive(Template)]
#[template(path = "profile_register.html")]
pub struct ProfileRegisterTemplate<'a> {
    pub title: &'a str,
    pub cats: &'a [Category],
    pub authenticated: bool,
    pub website: &'a str,
    pub errors: &'a [FieldError],
}
