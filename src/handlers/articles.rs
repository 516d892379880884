//! Article CRUD handlers, all behind the auth gate. The principal injected
//! by the middleware is the sole input to ownership scoping.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Principal};
use crate::services::ArticleService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// POST /api/article/create
pub async fn create_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<Value> {
    let title = payload.title.unwrap_or_default();
    let content = payload.content.unwrap_or_default();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request("title and content are required"));
    }

    let articles = ArticleService::new(state.articles.clone());
    let article = articles.create(&principal, &title, &content)?;

    Ok(ApiResponse::with_msg(
        "article created",
        json!({
            "article_id": article.id,
            "title": article.title,
            "create_time": article.create_time,
        }),
    ))
}

/// GET /api/article/list
pub async fn list_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Value> {
    let articles = ArticleService::new(state.articles.clone());
    let owned = articles.list(principal.user_id)?;

    Ok(ApiResponse::success(json!({
        "count": owned.len(),
        "articles": owned,
    })))
}

/// GET /api/article/:id
pub async fn show_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(article_id): Path<String>,
) -> ApiResult<Value> {
    let article_id: i64 = article_id
        .parse()
        .map_err(|_| ApiError::bad_request("article_id must be a number"))?;

    let articles = ArticleService::new(state.articles.clone());
    let article = articles.get(article_id, principal.user_id)?;

    Ok(ApiResponse::success(serde_json::to_value(article).map_err(
        |e| ApiError::internal(format!("failed to serialize article: {}", e)),
    )?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub article_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// POST /api/article/update
pub async fn update_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Value> {
    let article_id = payload
        .article_id
        .ok_or_else(|| ApiError::bad_request("article_id is required"))?;

    // Empty strings count as "not provided", like an omitted field
    let title = payload.title.filter(|t| !t.is_empty());
    let content = payload.content.filter(|c| !c.is_empty());
    if title.is_none() && content.is_none() {
        return Err(ApiError::bad_request("provide a new title or content"));
    }

    let articles = ArticleService::new(state.articles.clone());
    let article = articles.update(
        article_id,
        principal.user_id,
        title.as_deref(),
        content.as_deref(),
    )?;

    Ok(ApiResponse::with_msg(
        "article updated",
        json!({
            "article_id": article.id,
            "new_title": article.title,
            "update_time": article.update_time,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub article_id: Option<i64>,
}

/// POST /api/article/delete
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<DeleteRequest>,
) -> ApiResult<Value> {
    let article_id = payload
        .article_id
        .ok_or_else(|| ApiError::bad_request("article_id is required"))?;

    let articles = ArticleService::new(state.articles.clone());
    articles.delete(article_id, principal.user_id)?;

    Ok(ApiResponse::with_msg(
        "article deleted",
        json!({ "article_id": article_id }),
    ))
}
