use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use models::post::{Post, SortDirection, SortField};
use service::posts::{NewPost, PostPatch};

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// List all posts, optionally sorted by title or content.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let sort = q.sort.as_deref().map(SortField::parse).transpose()?;
    let direction = q
        .direction
        .as_deref()
        .map(SortDirection::parse)
        .transpose()?
        .unwrap_or_default();
    let posts = state.posts.list(sort, direction).await;
    info!(count = posts.len(), "list posts");
    Ok(Json(posts))
}

/// Create a post; the store assigns the id.
pub async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.posts.create(input).await?;
    info!(id = post.id, "created post");
    Ok((StatusCode::CREATED, Json(post)))
}

/// Partially update a post; absent fields keep their stored value.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<PostPatch>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts.update(id, patch).await?;
    info!(id, "updated post");
    Ok(Json(post))
}

/// Delete a post by id.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    state.posts.delete(id).await?;
    info!(id, "deleted post");
    Ok(Json(json!({
        "message": format!("Post with id {id} has been deleted successfully.")
    })))
}

/// Case-insensitive substring search over titles and contents.
pub async fn search_posts(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Json<Vec<Post>> {
    Json(state.posts.search(&q.title, &q.content).await)
}
