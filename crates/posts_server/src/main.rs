use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{NewPost, Post, PostId},
    error::{ApiError, ErrorCode},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use api::PostStore;
use config::load_settings;

/// PUT body. Only title and body are taken; the path carries the id.
#[derive(Debug, Deserialize)]
struct ReplacePostRequest {
    title: String,
    body: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let store = PostStore::seeded(settings.seed_posts);
    let app = build_router(store);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, seed_posts = settings.seed_posts, "posts server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(store: PostStore) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:post_id", put(replace_post).delete(delete_post))
        .with_state(store)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_posts(State(store): State<PostStore>) -> Json<Vec<Post>> {
    Json(store.list().await)
}

async fn create_post(
    State(store): State<PostStore>,
    Json(req): Json<NewPost>,
) -> (StatusCode, Json<Post>) {
    let post = store.create(req).await;
    info!(post_id = %post.id, "post created");
    (StatusCode::CREATED, Json(post))
}

async fn replace_post(
    State(store): State<PostStore>,
    Path(post_id): Path<i64>,
    Json(req): Json<ReplacePostRequest>,
) -> ApiResult<Json<Post>> {
    let post = store
        .replace(PostId(post_id), req.title, req.body)
        .await
        .map_err(into_response_error)?;
    info!(post_id, "post replaced");
    Ok(Json(post))
}

async fn delete_post(
    State(store): State<PostStore>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    store
        .delete(PostId(post_id))
        .await
        .map_err(into_response_error)?;
    info!(post_id, "post deleted");
    Ok(Json(serde_json::json!({})))
}

fn into_response_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
