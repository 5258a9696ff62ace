//! # Request handlers
//!
//! One handler per route. Handlers resolve the session, call into the
//! services, and render askama templates; validation failures re-render
//! the submitted form with field errors instead of erroring the request.

use askama::Template;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use domains::models::Category;
use domains::{AppError, FieldError};
use services::accounts::Registration;
use services::search::DEFAULT_RESULT_SIZE;
use services::visits;
use uuid::Uuid;

use crate::error::ApiError;
use crate::forms::{CategoryForm, GotoParams, LoginForm, PageForm, SearchForm};
use crate::session::{clear_session_cookie, open_session, set_session_cookie, SessionHandle};
use crate::state::AppState;
use crate::templates::*;

/// How many categories/pages the index shows per list.
const INDEX_LIST_LEN: i64 = 5;

fn render<T: Template>(template: &T) -> Result<Html<String>, ApiError> {
    template
        .render()
        .map(Html)
        .map_err(|err| AppError::Internal(format!("template rendering failed: {err}")).into())
}

/// Renders an HTML body and refreshes the session cookie on it.
fn html_with_session(state: &AppState, session: &SessionHandle, body: Html<String>) -> Response {
    let mut response = body.into_response();
    set_session_cookie(&mut response, state.signer.as_ref(), &session.token);
    response
}

async fn sidebar(state: &AppState) -> Result<Vec<Category>, ApiError> {
    Ok(state.content.sidebar_categories().await?)
}

// ── Index & about ────────────────────────────────────────────────────────────

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let mut session = open_session(&state, &headers).await?;

    // Visit tracking: the updated pair is stored before the response goes
    // out, and passed explicitly rather than mutated in ambient context.
    let tracked = visits::track_visit(
        session.data.visits.as_deref(),
        session.data.last_visit.as_deref(),
        Utc::now().naive_utc(),
    );
    let (visits_raw, last_visit_raw) = tracked.encode();
    session.data.visits = Some(visits_raw);
    session.data.last_visit = Some(last_visit_raw);
    state.sessions.save(&session.token, session.data.clone()).await?;

    let (categories, pages) = state.content.index_listing(INDEX_LIST_LEN).await?;
    let cats = sidebar(&state).await?;
    let body = render(&IndexTemplate {
        title: "Homepage",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        categories: &categories,
        pages: &pages,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn about(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let visits = session
        .data
        .visits
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(1);

    let cats = sidebar(&state).await?;
    let body = render(&AboutTemplate {
        title: "About",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        visits,
    })?;
    Ok(html_with_session(&state, &session, body))
}

// ── Categories & pages ───────────────────────────────────────────────────────

pub async fn show_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let detail = state.content.category_detail(&slug).await?;
    let cats = sidebar(&state).await?;

    // A missing category is a rendered state, not a fault.
    let (category, pages) = match &detail {
        Some((category, pages)) => (Some(category), pages.as_slice()),
        None => (None, &[][..]),
    };
    let body = render(&CategoryTemplate {
        title: category.map(|c| c.name.as_str()).unwrap_or("Unknown Category"),
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        category,
        pages,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn add_category_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let cats = sidebar(&state).await?;
    let body = render(&AddCategoryTemplate {
        title: "Add Category",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        name: "",
        errors: &[],
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn add_category_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;

    let errors = match state.content.add_category(&form.name).await {
        Ok(_) => return Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(errors)) => errors,
        Err(AppError::Conflict(_)) => vec![FieldError::new(
            "name",
            "A category with that name already exists.",
        )],
        Err(other) => return Err(other.into()),
    };

    let cats = sidebar(&state).await?;
    let body = render(&AddCategoryTemplate {
        title: "Add Category",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        name: &form.name,
        errors: &errors,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn add_page_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let detail = state.content.category_detail(&slug).await?;
    let cats = sidebar(&state).await?;
    let body = render(&AddPageTemplate {
        title: "Add Page",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        category: detail.as_ref().map(|(category, _)| category),
        page_title: "",
        page_url: "",
        errors: &[],
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn add_page_submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(form): Form<PageForm>,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;

    let errors = match state.content.add_page(&slug, &form.title, &form.url).await {
        Ok(_) => return Ok(Redirect::to(&format!("/category/{slug}")).into_response()),
        Err(AppError::Validation(errors)) => errors,
        // Unknown category: render the no-category state. No page row was
        // written, however valid the rest of the form was.
        Err(AppError::NotFound(..)) => Vec::new(),
        Err(other) => return Err(other.into()),
    };

    let detail = state.content.category_detail(&slug).await?;
    let cats = sidebar(&state).await?;
    let body = render(&AddPageTemplate {
        title: "Add Page",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        category: detail.as_ref().map(|(category, _)| category),
        page_title: &form.title,
        page_url: &form.url,
        errors: &errors,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn like_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let likes = state.content.like_category(&slug).await?;
    Ok(likes.to_string().into_response())
}

// ── Click-through tracking ───────────────────────────────────────────────────

pub async fn goto_page(
    State(state): State<AppState>,
    Query(params): Query<GotoParams>,
) -> Result<Response, ApiError> {
    let page_id = params
        .page_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok());

    match state.content.track_page_click(page_id).await? {
        Some(url) => Ok(Redirect::to(&url).into_response()),
        None => Ok(Redirect::to("/").into_response()),
    }
}

// ── Registration & login ─────────────────────────────────────────────────────

pub async fn register_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let cats = sidebar(&state).await?;
    let body = render(&RegisterTemplate {
        title: "Register",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        registered: false,
        username: "",
        email: "",
        website: "",
        errors: &[],
    })?;
    Ok(html_with_session(&state, &session, body))
}

/// Pulls the registration fields out of a multipart body. The picture, if
/// any, is stored immediately and replaced by its media id.
async fn read_registration(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<Registration, ApiError> {
    let mut reg = Registration::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Internal(format!("multipart read failed: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => reg.username = field_text(field).await?,
            "email" => reg.email = field_text(field).await?,
            "password" => reg.password = field_text(field).await?,
            "website" => reg.website = field_text(field).await?,
            "picture" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::Internal(format!("upload read failed: {err}")))?;
                if !data.is_empty() {
                    let media_id = state.media.save_picture(data.to_vec(), &content_type).await?;
                    reg.picture = Some(media_id);
                }
            }
            _ => {}
        }
    }

    Ok(reg)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| AppError::Internal(format!("multipart read failed: {err}")).into())
}

pub async fn register_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let reg = read_registration(&state, &mut multipart).await?;

    let (registered, errors) = match state.accounts.register(reg.clone()).await {
        Ok(_) => (true, Vec::new()),
        Err(AppError::Validation(errors)) => (false, errors),
        Err(AppError::Conflict(_)) => (
            false,
            vec![FieldError::new("username", "That username is already taken.")],
        ),
        Err(other) => return Err(other.into()),
    };

    let cats = sidebar(&state).await?;
    let body = render(&RegisterTemplate {
        title: "Register",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        registered,
        username: if registered { "" } else { &reg.username },
        email: if registered { "" } else { &reg.email },
        website: if registered { "" } else { &reg.website },
        errors: &errors,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn login_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let cats = sidebar(&state).await?;
    let body = render(&LoginTemplate {
        title: "Login",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        username: "",
        error: None,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let mut session = open_session(&state, &headers).await?;

    let message = match state.accounts.login(&form.username, &form.password).await {
        Ok(account) => {
            session.data.account = Some(account.id);
            state.sessions.save(&session.token, session.data.clone()).await?;

            let mut response = Redirect::to("/").into_response();
            set_session_cookie(&mut response, state.signer.as_ref(), &session.token);
            return Ok(response);
        }
        Err(AppError::Unauthorized(message)) => message,
        Err(other) => return Err(other.into()),
    };

    let cats = sidebar(&state).await?;
    let body = render(&LoginTemplate {
        title: "Login",
        cats: &cats,
        authenticated: false,
        username: &form.username,
        error: Some(&message),
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    if !session.data.is_authenticated() {
        return Ok(Redirect::to("/login").into_response());
    }

    state.sessions.delete(&session.token).await?;
    let mut response = Redirect::to("/").into_response();
    clear_session_cookie(&mut response);
    Ok(response)
}

pub async fn restricted(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    if !session.data.is_authenticated() {
        return Ok(Redirect::to("/login").into_response());
    }

    let cats = sidebar(&state).await?;
    let body = render(&RestrictedTemplate {
        title: "Restricted",
        cats: &cats,
        authenticated: true,
    })?;
    Ok(html_with_session(&state, &session, body))
}

// ── Search ───────────────────────────────────────────────────────────────────

pub async fn search_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let cats = sidebar(&state).await?;
    let body = render(&SearchTemplate {
        title: "Search",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        query: "",
        results: &[],
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn search_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let results = state.search.run_query(&form.query, DEFAULT_RESULT_SIZE).await;

    let cats = sidebar(&state).await?;
    let body = render(&SearchTemplate {
        title: "Search",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        query: form.query.trim(),
        results: &results,
    })?;
    Ok(html_with_session(&state, &session, body))
}

// ── Profiles ─────────────────────────────────────────────────────────────────

pub async fn show_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;

    let Some((account, profile)) = state.accounts.profile_for(&username).await? else {
        return Ok(Redirect::to("/profiles").into_response());
    };
    let row = ProfileRow {
        username: account.username,
        email: account.email,
        website: profile.website,
        picture_url: profile.picture.as_deref().map(|id| state.media.picture_url(id)),
    };

    let cats = sidebar(&state).await?;
    let body = render(&ProfileTemplate {
        title: "Profile",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        profile: &row,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;

    let profiles: Vec<ProfileRow> = state
        .accounts
        .list_profiles()
        .await?
        .into_iter()
        .map(|(account, profile)| ProfileRow {
            username: account.username,
            email: account.email,
            website: profile.website,
            picture_url: profile.picture.as_deref().map(|id| state.media.picture_url(id)),
        })
        .collect();

    let cats = sidebar(&state).await?;
    let body = render(&ProfileListTemplate {
        title: "User Profiles",
        cats: &cats,
        authenticated: session.data.is_authenticated(),
        profiles: &profiles,
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn profile_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    if !session.data.is_authenticated() {
        return Ok(Redirect::to("/login").into_response());
    }

    let cats = sidebar(&state).await?;
    let body = render(&ProfileRegisterTemplate {
        title: "Register Profile",
        cats: &cats,
        authenticated: true,
        website: "",
        errors: &[],
    })?;
    Ok(html_with_session(&state, &session, body))
}

pub async fn profile_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = open_session(&state, &headers).await?;
    let Some(account_id) = session.data.account else {
        return Ok(Redirect::to("/login").into_response());
    };

    // The profile form reuses the registration field names it shares.
    let reg = read_registration(&state, &mut multipart).await?;

    let errors = match state
        .accounts
        .complete_profile(account_id, &reg.website, reg.picture.clone())
        .await
    {
        Ok(_) => return Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(errors)) => errors,
        Err(other) => return Err(other.into()),
    };

    let cats = sidebar(&state).await?;
    let body = render(&ProfileRegisterTemplate {
        title: "Register Profile",
        cats: &cats,
        authenticated: true,
        website: &reg.website,
        errors: &errors,
    })?;
    Ok(html_with_session(&state, &session, body))
}
