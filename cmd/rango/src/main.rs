//! # Rango Binary
//!
//! The entry point that assembles the application from its adapters.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use auth_adapters::{Argon2Passwords, HmacTokenSigner};
use configs::Settings;
use domains::ports::SearchProvider;
use secrecy::ExposeSecret;
use services::{AccountService, ContentService, SearchService};
use storage_adapters::search::DEFAULT_TIMEOUT;
use storage_adapters::{
    DisabledSearch, LocalMediaStore, MemorySessionStore, SearchApiGateway, SqliteRepo,
};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Configuration (reads rango.toml, RANGO__* env vars, and .env).
    //    The search key is read exactly once, here; a missing key file with
    //    search enabled aborts startup.
    let settings = Settings::load().context("loading configuration")?;
    let search_key = settings
        .load_search_key()
        .context("loading search API key")?;

    // 2. Storage
    let repo = Arc::new(
        SqliteRepo::new(&settings.database.url)
            .await
            .context("opening database")?,
    );
    let sessions = Arc::new(MemorySessionStore::new());
    let media = Arc::new(LocalMediaStore::new(
        settings.media.root.clone(),
        settings.media.url_prefix.clone(),
    ));

    // 3. Auth
    let passwords = Arc::new(Argon2Passwords::new());
    let signer = Arc::new(HmacTokenSigner::new(
        settings.session.signing_secret.expose_secret(),
    ));

    // 4. Search gateway
    let provider: Arc<dyn SearchProvider> = match search_key {
        Some(token) => Arc::new(SearchApiGateway::new(
            settings.search.endpoint.clone(),
            token,
            DEFAULT_TIMEOUT,
        )?),
        None => Arc::new(DisabledSearch),
    };

    // 5. Services and shared state
    let state = AppState {
        content: Arc::new(ContentService::new(repo.clone())),
        accounts: Arc::new(AccountService::new(repo.clone(), passwords)),
        search: Arc::new(SearchService::new(provider)),
        sessions,
        signer,
        media,
    };

    // 6. Router, with uploaded media served statically
    let app = router(state).nest_service(
        settings.media.url_prefix.as_str(),
        ServeDir::new(&settings.media.root),
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "rango listening");
    axum::serve(listener, app).await?;

    Ok(())
}
