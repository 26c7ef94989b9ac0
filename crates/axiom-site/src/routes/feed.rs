//! RSS feed endpoint.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::Utc;

use axiom_common::constants::{RSS_CACHE_CONTROL, RSS_ITEM_LIMIT};
use crate::rss::render_feed;
use crate::state::AppState;

/// Feed of the most recent published posts.
///
/// A CMS failure is logged and served as an empty feed.
pub async fn rss_feed(State(state): State<AppState>) -> impl IntoResponse {
    let posts = match state.cms.recent_posts(RSS_ITEM_LIMIT).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching blog posts for RSS");
            Vec::new()
        }
    };

    tracing::debug!(items = posts.len(), "Rendering RSS feed");
    let xml = render_feed(state.config.site_root(), &posts, Utc::now());

    (
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, RSS_CACHE_CONTROL),
        ],
        xml,
    )
}
