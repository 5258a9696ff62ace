//! # SQLite repositories
//!
//! Implements the data mapping between the SQLite relational model and the
//! `domains` models. One pool backs both the content and account ports.

use std::str::FromStr;

use async_trait::async_trait;
use domains::models::{Account, Category, Page, UserProfile};
use domains::ports::{AccountRepo, ContentRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

// Tables are created on first connect; there is no separate migration step.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS categories (
        id    BLOB PRIMARY KEY,
        name  TEXT NOT NULL,
        slug  TEXT NOT NULL UNIQUE,
        views INTEGER NOT NULL DEFAULT 0,
        likes INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS pages (
        id          BLOB PRIMARY KEY,
        category_id BLOB NOT NULL REFERENCES categories(id),
        title       TEXT NOT NULL,
        url         TEXT NOT NULL,
        views       INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS accounts (
        id            BLOB PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        email         TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        is_active     INTEGER NOT NULL DEFAULT 1,
        created_at    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS profiles (
        account_id BLOB PRIMARY KEY REFERENCES accounts(id),
        website    TEXT NOT NULL DEFAULT '',
        picture    TEXT
    )",
];

pub struct SqliteRepo {
    pool: SqlitePool,
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

impl SqliteRepo {
    /// Opens (creating if missing) the database at `url` and ensures the
    /// schema exists.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// Single-connection in-memory database. Each pooled connection gets
    /// its own `:memory:` database, so tests must pin the pool to one.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        slug: row.get("slug"),
        views: row.get("views"),
        likes: row.get("likes"),
    }
}

fn row_to_page(row: &sqlx::sqlite::SqliteRow) -> Page {
    Page {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        category_id: blob_to_uuid(row.get::<Vec<u8>, _>("category_id").as_slice()),
        title: row.get("title"),
        url: row.get("url"),
        views: row.get("views"),
    }
}

fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Account {
    Account {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ContentRepo for SqliteRepo {
    async fn get_category(&self, slug: &str) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_category))
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_category).collect())
    }

    async fn top_categories(&self, limit: i64) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY likes DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_category).collect())
    }

    async fn create_category(&self, category: Category) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO categories (id, name, slug, views, likes) VALUES (?, ?, ?, ?, ?)")
            .bind(uuid_to_blob(category.id))
            .bind(category.name)
            .bind(category.slug)
            .bind(category.views)
            .bind(category.likes)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn like_category(&self, slug: &str) -> anyhow::Result<Option<i64>> {
        let row = sqlx::query("UPDATE categories SET likes = likes + 1 WHERE slug = ? RETURNING likes")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("likes")))
    }

    async fn pages_for_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Page>> {
        let rows = sqlx::query("SELECT * FROM pages WHERE category_id = ? ORDER BY views DESC")
            .bind(uuid_to_blob(category_id))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_page).collect())
    }

    async fn top_pages(&self, limit: i64) -> anyhow::Result<Vec<Page>> {
        let rows = sqlx::query("SELECT * FROM pages ORDER BY views DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_page).collect())
    }

    async fn create_page(&self, page: Page) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO pages (id, category_id, title, url, views) VALUES (?, ?, ?, ?, ?)")
            .bind(uuid_to_blob(page.id))
            .bind(uuid_to_blob(page.category_id))
            .bind(page.title)
            .bind(page.url)
            .bind(page.views)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_page(&self, id: Uuid) -> anyhow::Result<Option<Page>> {
        let row = sqlx::query("SELECT * FROM pages WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_page))
    }

    /// The increment and the URL read happen in one statement, so repeated
    /// clicks each count exactly once even under concurrent requests.
    async fn record_page_visit(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("UPDATE pages SET views = views + 1 WHERE id = ? RETURNING url")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("url")))
    }
}

#[async_trait]
impl AccountRepo for SqliteRepo {
    async fn create_account(&self, account: Account) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO accounts (id, username, email, password_hash, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(account.id))
        .bind(account.username)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.is_active)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_account(&self, username: &str) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_account))
    }

    async fn save_profile(&self, profile: UserProfile) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO profiles (account_id, website, picture) VALUES (?, ?, ?)
             ON CONFLICT(account_id) DO UPDATE SET website = excluded.website,
                                                   picture = excluded.picture",
        )
        .bind(uuid_to_blob(profile.account_id))
        .bind(profile.website)
        .bind(profile.picture)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_profile(&self, account_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE account_id = ?")
            .bind(uuid_to_blob(account_id))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| UserProfile {
            account_id: blob_to_uuid(row.get::<Vec<u8>, _>("account_id").as_slice()),
            website: row.get("website"),
            picture: row.get("picture"),
        }))
    }

    async fn list_profiles(&self) -> anyhow::Result<Vec<(Account, UserProfile)>> {
        let rows = sqlx::query(
            "SELECT a.*, p.website, p.picture FROM accounts a
             JOIN profiles p ON p.account_id = a.id
             ORDER BY a.username ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let account = row_to_account(row);
                let profile = UserProfile {
                    account_id: account.id,
                    website: row.get("website"),
                    picture: row.get("picture"),
                };
                (account, profile)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str, slug: &str, likes: i64) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            views: 0,
            likes,
        }
    }

    fn page(category_id: Uuid, title: &str, views: i64) -> Page {
        Page {
            id: Uuid::new_v4(),
            category_id,
            title: title.into(),
            url: format!("http://example.com/{title}"),
            views,
        }
    }

    #[tokio::test]
    async fn top_categories_orders_by_likes_and_caps() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        for (name, likes) in [("Python", 64), ("Django", 32), ("Bottle", 16), ("Flask", 48)] {
            repo.create_category(category(name, &name.to_lowercase(), likes))
                .await
                .unwrap();
        }

        let top = repo.top_categories(3).await.unwrap();
        assert_eq!(top.len(), 3);
        let names: Vec<_> = top.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Python", "Flask", "Django"]);
    }

    #[tokio::test]
    async fn record_page_visit_bumps_once_and_returns_url() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        let cat = category("Python", "python", 0);
        repo.create_category(cat.clone()).await.unwrap();
        let page = page(cat.id, "tutorial", 0);
        repo.create_page(page.clone()).await.unwrap();

        let target = repo.record_page_visit(page.id).await.unwrap();
        assert_eq!(target.as_deref(), Some(page.url.as_str()));
        assert_eq!(repo.get_page(page.id).await.unwrap().unwrap().views, 1);

        // Unknown ids change nothing.
        assert!(repo.record_page_visit(Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(repo.get_page(page.id).await.unwrap().unwrap().views, 1);
    }

    #[tokio::test]
    async fn like_category_returns_new_total() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        repo.create_category(category("Django", "django", 5))
            .await
            .unwrap();

        assert_eq!(repo.like_category("django").await.unwrap(), Some(6));
        assert_eq!(repo.like_category("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn account_and_profile_roundtrip() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        let account = Account {
            id: Uuid::new_v4(),
            username: "leifos".into(),
            email: "leifos@tango.example".into(),
            password_hash: "$argon2id$stub".into(),
            is_active: true,
            created_at: Utc::now(),
        };
        repo.create_account(account.clone()).await.unwrap();

        let found = repo.find_account("leifos").await.unwrap().unwrap();
        assert_eq!(found.id, account.id);
        assert!(found.is_active);

        repo.save_profile(UserProfile {
            account_id: account.id,
            website: "http://www.tangowithdjango.com".into(),
            picture: None,
        })
        .await
        .unwrap();
        // Saving again replaces rather than duplicates.
        repo.save_profile(UserProfile {
            account_id: account.id,
            website: "http://www.dcs.gla.ac.uk".into(),
            picture: Some("abc.png".into()),
        })
        .await
        .unwrap();

        let profiles = repo.list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].1.website, "http://www.dcs.gla.ac.uk");
    }
}
