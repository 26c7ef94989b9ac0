//! Blog content endpoints (JSON passthrough of CMS documents).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use axiom_common::BlogPost;
use axiom_common::constants::RELATED_POST_LIMIT;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    post: BlogPost,
    related: Vec<BlogPost>,
}

/// All published posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    state.cms.published_posts().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Error fetching blog posts");
        ApiError::BadGateway
    })
}

/// Newest post flagged as featured
pub async fn featured_post(State(state): State<AppState>) -> Result<Json<BlogPost>, ApiError> {
    match state.cms.featured_post().await {
        Ok(Some(post)) => Ok(Json(post)),
        Ok(None) => Err(ApiError::NotFound("No featured post")),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching featured post");
            Err(ApiError::BadGateway)
        }
    }
}

/// A single post with up to three related posts
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = match state.cms.post_by_slug(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ApiError::NotFound("Post not found")),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "Error fetching blog post");
            return Err(ApiError::BadGateway);
        }
    };

    let related = state
        .cms
        .related_posts(&post, RELATED_POST_LIMIT)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(slug = %slug, error = %e, "Error fetching related posts");
            Vec::new()
        });

    Ok(Json(PostResponse { post, related }))
}
