//! Seeds a fresh Rango database with the starter categories and pages so
//! the index has something to show. Safe to re-run: existing categories
//! are left alone.

use anyhow::Result;
use domains::models::{Category, Page};
use domains::ports::ContentRepo;
use services::slug::slugify;
use storage_adapters::SqliteRepo;
use uuid::Uuid;

type PageSeed = (&'static str, &'static str, i64);

const DATA: &[(&'static str, i64, i64, &[PageSeed])] = &[
    (
        "Python",
        64,
        128,
        &[
            ("Official Python Tutorial", "http://docs.python.org/3/tutorial/", 32),
            ("How to Think like a Computer Scientist", "http://www.greenteapress.com/thinkpython/", 16),
            ("Learn Python in 10 Minutes", "http://www.korokithakis.net/tutorials/python/", 8),
        ],
    ),
    (
        "Django",
        32,
        64,
        &[
            ("Official Django Tutorial", "https://docs.djangoproject.com/en/2.1/intro/tutorial01/", 32),
            ("Django Rocks", "http://www.djangorocks.com/", 12),
            ("How to Tango with Django", "http://www.tangowithdjango.com/", 8),
        ],
    ),
    (
        "Other Frameworks",
        16,
        32,
        &[
            ("Bottle", "http://bottlepy.org/docs/dev/", 14),
            ("Flask", "http://flask.pocoo.org", 10),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    let url = std::env::var("RANGO__DATABASE__URL")
        .unwrap_or_else(|_| "sqlite:rango.db".to_string());
    let repo = SqliteRepo::new(&url).await?;

    for (name, likes, views, pages) in DATA {
        let slug = slugify(name);
        if repo.get_category(&slug).await?.is_some() {
            println!("category '{name}' already present, skipping");
            continue;
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: (*name).to_string(),
            slug,
            views: *views,
            likes: *likes,
        };
        repo.create_category(category.clone()).await?;
        println!("{name}");

        for (title, page_url, page_views) in *pages {
            repo.create_page(Page {
                id: Uuid::new_v4(),
                category_id: category.id,
                title: (*title).to_string(),
                url: (*page_url).to_string(),
                views: *page_views,
            })
            .await?;
            println!("- {name} - {title}");
        }
    }

    Ok(())
}
