//! # api-adapters
//!
//! The web routing and orchestration layer for Rango: axum routes, askama
//! templates, form validation, and session cookie plumbing.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod session;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the application router. Static assets (uploaded media) are
/// mounted by the binary, which knows the filesystem layout.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/about", get(handlers::about))
        .route(
            "/category/add",
            get(handlers::add_category_form).post(handlers::add_category_submit),
        )
        .route("/category/{slug}", get(handlers::show_category))
        .route(
            "/category/{slug}/add_page",
            get(handlers::add_page_form).post(handlers::add_page_submit),
        )
        .route("/category/{slug}/like", post(handlers::like_category))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register_submit),
        )
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login_submit),
        )
        .route("/logout", get(handlers::logout))
        .route("/restricted", get(handlers::restricted))
        .route("/goto", get(handlers::goto_page))
        .route(
            "/search",
            get(handlers::search_form).post(handlers::search_submit),
        )
        .route("/profiles", get(handlers::list_profiles))
        .route(
            "/profile/register",
            get(handlers::profile_form).post(handlers::profile_submit),
        )
        .route("/profile/{username}", get(handlers::show_profile))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
