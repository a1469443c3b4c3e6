//! HTTP surface: the dashboard page and a small JSON auth API.
//!
//! API guide
//! - `GET  /`                      dashboard for the configured or logged-in user (HTML)
//! - `POST /login`                 form login, sets the `session` cookie
//! - `GET  /healthz`               liveness
//! - `GET  /api/customers`         customer table (JSON)
//! - `POST /api/register`          `{ username, email, password }` → 201
//! - `POST /api/login`             `{ username, password }` → `{ token, expires_at }`
//! - `GET  /api/session/{token}`   `{ user_id, expires_at }` or 404
//! - `DELETE /api/session/{token}` 204 or 404

use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::Auth;
use crate::config::APP_TITLE;
use crate::connector::DataSource;
use crate::dashboard::{self, CurrentUser};
use crate::render::{render_login, render_page};
use crate::table::Table;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Shared state of the HTTP handlers.
pub struct AppState<S> {
    pub auth: Auth,
    pub source: Arc<S>,
    pub current_user: Option<CurrentUser>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            source: Arc::clone(&self.source),
            current_user: self.current_user.clone(),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(auth: Auth, source: S, current_user: Option<CurrentUser>) -> Self {
        Self {
            auth,
            source: Arc::new(source),
            current_user,
        }
    }
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("session not found")]
    SessionNotFound,

    #[error("data source unavailable")]
    SourceUnavailable,

    #[error(transparent)]
    Internal(#[from] crate::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::SourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    username: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

/// Builds the application router.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: DataSource + 'static,
{
    Router::new()
        .route("/", get(dashboard_page::<S>))
        .route("/login", post(login_form::<S>))
        .route("/healthz", get(healthz))
        .route("/api/customers", get(customers::<S>))
        .route("/api/register", post(register::<S>))
        .route("/api/login", post(login::<S>))
        .route(
            "/api/session/{token}",
            get(get_session::<S>).delete(delete_session::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves the router until the process exits.
pub async fn serve<S>(addr: &str, state: AppState<S>) -> std::io::Result<()>
where
    S: DataSource + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "serving sales dashboard");
    axum::serve(listener, router(state)).await
}

/// Renders the dashboard for the configured user, or else for the owner of
/// the request's session cookie. Without either the login prompt is shown.
async fn dashboard_page<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let user = match &state.current_user {
        Some(user) => Some(user.clone()),
        None => match session_cookie(&headers) {
            Some(token) => state
                .auth
                .session_user(token)
                .await?
                .map(|user| CurrentUser::new(user.username)),
            None => None,
        },
    };

    Ok(match user {
        Some(user) => {
            let view = dashboard::build(Some(&user), state.source.as_ref()).await;
            Html(render_page(APP_TITLE, &view))
        }
        None => Html(render_login(APP_TITLE)),
    })
}

/// Extracts the session token from the `Cookie` header.
fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .filter(|token| !token.is_empty())
    })
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn customers<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Table>, ApiError> {
    let source = state.source.as_ref();
    let handle = source.connect().await.ok_or(ApiError::SourceUnavailable)?;
    let table = source.customer_data(Some(&handle)).await;
    if let Err(e) = source.close(handle).await {
        tracing::warn!(error = %e, "error closing SAP HANA connection");
    }
    Ok(Json(table))
}

async fn register<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
    Json(params): Json<RegisterParams>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .auth
        .create_user(&params.username, &params.email, &params.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        }),
    ))
}

async fn start_session(auth: &Auth, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let user = auth
        .authenticate_user(username, password)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    let session = auth.start_session(user.id).await?;

    Ok(LoginResponse {
        token: session.session_id,
        expires_at: session.expiry_timestamp,
    })
}

async fn login<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
    Json(params): Json<LoginParams>,
) -> Result<Json<LoginResponse>, ApiError> {
    start_session(&state.auth, &params.username, &params.password)
        .await
        .map(Json)
}

async fn login_form<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
    Form(params): Form<LoginParams>,
) -> Response {
    match start_session(&state.auth, &params.username, &params.password).await {
        Ok(login) => {
            let max_age = state.auth.session_lifetime().num_seconds().max(0);
            let cookie = format!(
                "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
                login.token
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(ApiError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, Html(render_login(APP_TITLE))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn get_session<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
    Path(token): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .auth
        .get_session(&token)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    Ok(Json(SessionResponse {
        user_id: session.user_id,
        expires_at: session.expiry_timestamp,
    }))
}

async fn delete_session<S: DataSource + 'static>(
    State(state): State<AppState<S>>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.auth.delete_session(&token).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}
