//! # Content service
//!
//! Category and page operations over the [`ContentRepo`] port: listings,
//! form-backed creation, likes, and the click-through view counter.

use std::sync::Arc;

use domains::{AppError, Category, ContentRepo, FieldError, Page, Result};
use tracing::{debug, info};
use uuid::Uuid;

use crate::slug::slugify;

const MAX_NAME_LEN: usize = 128;
const MAX_URL_LEN: usize = 200;

/// Prepends a scheme when the submitted URL has none, as the original form
/// cleaning did, then applies shape checks.
pub fn normalize_url(raw: &str) -> std::result::Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("This field is required.".to_string());
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err("Enter a valid URL.".to_string());
    }

    let url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    // Something must follow the scheme.
    let host = url.splitn(2, "://").nth(1).unwrap_or("");
    if host.is_empty() || url.len() > MAX_URL_LEN {
        return Err("Enter a valid URL.".to_string());
    }

    Ok(url)
}

pub struct ContentService {
    repo: Arc<dyn ContentRepo>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn ContentRepo>) -> Self {
        Self { repo }
    }

    /// Top categories by likes and top pages by views for the index.
    pub async fn index_listing(&self, limit: i64) -> Result<(Vec<Category>, Vec<Page>)> {
        let categories = self.repo.top_categories(limit).await?;
        let pages = self.repo.top_pages(limit).await?;
        Ok((categories, pages))
    }

    /// Full category list for the navigation sidebar.
    pub async fn sidebar_categories(&self) -> Result<Vec<Category>> {
        Ok(self.repo.list_categories().await?)
    }

    /// A category and its pages, or None when the slug resolves nowhere.
    pub async fn category_detail(&self, slug: &str) -> Result<Option<(Category, Vec<Page>)>> {
        let Some(category) = self.repo.get_category(slug).await? else {
            return Ok(None);
        };
        let pages = self.repo.pages_for_category(category.id).await?;
        Ok(Some((category, pages)))
    }

    pub async fn add_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "This field is required."));
        } else if name.len() > MAX_NAME_LEN {
            errors.push(FieldError::new("name", "Name is too long."));
        }

        let slug = slugify(name);
        if !name.is_empty() && slug.is_empty() {
            errors.push(FieldError::new("name", "Name must contain letters or digits."));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if self.repo.get_category(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "a category with slug '{slug}' already exists"
            )));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug,
            views: 0,
            likes: 0,
        };
        self.repo.create_category(category.clone()).await?;
        info!(slug = %category.slug, "category created");
        Ok(category)
    }

    /// Creates a page under an existing category. An unresolvable slug is
    /// NotFound and nothing is written, regardless of field validity.
    pub async fn add_page(&self, category_slug: &str, title: &str, url: &str) -> Result<Page> {
        let Some(category) = self.repo.get_category(category_slug).await? else {
            return Err(AppError::not_found("category", category_slug));
        };

        let title = title.trim();
        let mut errors = Vec::new();
        if title.is_empty() {
            errors.push(FieldError::new("title", "This field is required."));
        } else if title.len() > MAX_NAME_LEN {
            errors.push(FieldError::new("title", "Title is too long."));
        }
        let url = match normalize_url(url) {
            Ok(url) => Some(url),
            Err(message) => {
                errors.push(FieldError::new("url", message));
                None
            }
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let page = Page {
            id: Uuid::new_v4(),
            category_id: category.id,
            title: title.to_string(),
            url: url.unwrap_or_default(),
            views: 0,
        };
        self.repo.create_page(page.clone()).await?;
        info!(category = %category.slug, title = %page.title, "page created");
        Ok(page)
    }

    pub async fn like_category(&self, slug: &str) -> Result<i64> {
        match self.repo.like_category(slug).await? {
            Some(likes) => Ok(likes),
            None => Err(AppError::not_found("category", slug)),
        }
    }

    /// Click-through tracking: bump the counter and hand back the stored
    /// URL. An absent or unknown id writes nothing and yields None; the
    /// caller falls back to the index.
    pub async fn track_page_click(&self, page_id: Option<Uuid>) -> Result<Option<String>> {
        let Some(id) = page_id else {
            debug!("goto request without a page id");
            return Ok(None);
        };
        let target = self.repo.record_page_visit(id).await?;
        if target.is_none() {
            debug!(%id, "goto request for an unknown page");
        }
        Ok(target)
    }
}
