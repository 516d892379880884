pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{SessionStore, TokenService};
use crate::storage::{ArticleRecord, JsonStore, UserRecord};

/// Shared handles injected into every handler. Built once per process (or
/// per test), never global, so tests run against isolated stores.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<JsonStore<UserRecord>>,
    pub articles: Arc<JsonStore<ArticleRecord>>,
    pub sessions: Arc<SessionStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(data_dir: &Path) -> anyhow::Result<Self> {
        let security = &config::config().security;
        Ok(Self {
            users: Arc::new(JsonStore::open(data_dir.join("users.json"))?),
            articles: Arc::new(JsonStore::open(data_dir.join("articles.json"))?),
            sessions: Arc::new(SessionStore::new(Duration::hours(
                security.session_lifetime_hours as i64,
            ))),
            tokens: Arc::new(TokenService::from_config()?),
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/login", post(handlers::auth::login_post))
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::{articles, auth};

    Router::new()
        .route("/api/logout", post(auth::logout_post))
        .route("/api/article/create", post(articles::create_post))
        .route("/api/article/list", get(articles::list_get))
        .route("/api/article/:id", get(articles::show_get))
        .route("/api/article/update", post(articles::update_post))
        .route("/api/article/delete", post(articles::delete_post))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "code": 200,
        "msg": "ok",
        "data": {
            "name": "Quill API",
            "version": version,
            "description": "Minimal authenticated blogging backend",
            "endpoints": {
                "login": "POST /api/login (public)",
                "logout": "POST /api/logout (protected)",
                "articles": "POST /api/article/{create,update,delete}, GET /api/article/list, GET /api/article/:id (protected)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "code": 200,
        "msg": "ok",
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
