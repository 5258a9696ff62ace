//! Route-level tests driving the full router with in-memory adapters.

use std::sync::Arc;

use api_adapters::{router, AppState};
use auth_adapters::HmacTokenSigner;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domains::models::{Category, Page};
use domains::ports::ContentRepo;
use domains::{MockMediaStore, MockPasswordService, MockSearchProvider};
use services::{AccountService, ContentService, SearchService};
use storage_adapters::{MemorySessionStore, SqliteRepo};
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> (Router, Arc<SqliteRepo>) {
    let repo = Arc::new(SqliteRepo::in_memory().await.unwrap());
    let sessions = Arc::new(MemorySessionStore::new());

    let mut passwords = MockPasswordService::new();
    passwords
        .expect_hash_password()
        .returning(|_| Ok("$argon2id$stub".to_string()));
    passwords
        .expect_verify_password()
        .returning(|password, _| password == "wubble123");

    let mut search = MockSearchProvider::new();
    search.expect_search().returning(|_, _| Ok(Vec::new()));

    let mut media = MockMediaStore::new();
    media
        .expect_save_picture()
        .returning(|_, _| Ok("deadbeef.png".to_string()));
    media
        .expect_picture_url()
        .returning(|id| format!("/media/{id}"));

    let state = AppState {
        content: Arc::new(ContentService::new(repo.clone())),
        accounts: Arc::new(AccountService::new(repo.clone(), Arc::new(passwords))),
        search: Arc::new(SearchService::new(Arc::new(search))),
        sessions,
        signer: Arc::new(HmacTokenSigner::new("test-secret")),
        media: Arc::new(media),
    };
    (router(state), repo)
}

async fn seed_page(repo: &SqliteRepo) -> Page {
    let category = Category {
        id: Uuid::new_v4(),
        name: "Python".into(),
        slug: "python".into(),
        views: 0,
        likes: 0,
    };
    repo.create_category(category.clone()).await.unwrap();

    let page = Page {
        id: Uuid::new_v4(),
        category_id: category.id,
        title: "Official Python Tutorial".into(),
        url: "http://docs.python.org/3/tutorial/".into(),
        views: 0,
    };
    repo.create_page(page.clone()).await.unwrap();
    page
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_renders_and_issues_a_session_cookie() {
    let (app, _repo) = test_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("index must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("rango_session="));

    let body = body_text(response).await;
    assert!(body.contains("Most Liked Categories"));
}

#[tokio::test]
async fn goto_with_valid_id_redirects_and_counts_once() {
    let (app, repo) = test_app().await;
    let page = seed_page(&repo).await;

    let response = app
        .oneshot(get(&format!("/goto?page_id={}", page.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        page.url.as_str()
    );
    assert_eq!(repo.get_page(page.id).await.unwrap().unwrap().views, 1);
}

#[tokio::test]
async fn goto_with_bad_or_missing_id_falls_back_to_index() {
    let (app, repo) = test_app().await;
    let page = seed_page(&repo).await;

    let unknown = format!("/goto?page_id={}", Uuid::new_v4());
    for uri in ["/goto", "/goto?page_id=not-a-uuid", unknown.as_str()] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }
    // None of those requests may touch the real page's counter.
    assert_eq!(repo.get_page(page.id).await.unwrap().unwrap().views, 0);
}

#[tokio::test]
async fn add_page_to_unknown_category_creates_nothing() {
    let (app, repo) = test_app().await;

    let response = app
        .oneshot(post_form(
            "/category/no-such-category/add_page",
            "title=Perfectly+Valid&url=http://example.com/",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("does not exist"));

    assert!(repo.top_pages(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_category_then_listing_shows_it() {
    let (app, _repo) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_form("/category/add", "name=Other+Frameworks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let response = app.oneshot(get("/category/other-frameworks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Other Frameworks"));
}

#[tokio::test]
async fn restricted_redirects_anonymous_visitors_to_login() {
    let (app, _repo) = test_app().await;

    let response = app.oneshot(get("/restricted")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn same_day_revisits_keep_the_counter_at_one() {
    let (app, _repo) = test_app().await;

    let first = app.clone().oneshot(get("/")).await.unwrap();
    let cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    // A second tracked request inside the same day must not increment.
    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap();

    let request = Request::builder()
        .uri("/about")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let about = app.oneshot(request).await.unwrap();
    let body = body_text(about).await;
    assert!(body.contains("visited the site 1 time"));
}

#[tokio::test]
async fn like_endpoint_returns_the_new_total() {
    let (app, repo) = test_app().await;
    seed_page(&repo).await;

    let response = app
        .clone()
        .oneshot(post_form("/category/python/like", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "1");

    let response = app
        .oneshot(post_form("/category/missing/like", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_with_no_results_still_renders_the_page() {
    let (app, _repo) = test_app().await;

    let response = app
        .oneshot(post_form("/search", "query=rust+web+frameworks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("No results found"));
}
