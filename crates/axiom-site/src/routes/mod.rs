//! HTTP route handlers for the site services.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::state::AppState;

mod blog;
mod feed;
mod forms;
mod health;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(state.config.site_root());

    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))

        // Form submissions
        .route("/api/contact", post(forms::submit_contact))
        .route("/api/pilot-program", post(forms::submit_pilot_application))

        // Content
        .route("/api/rss", get(feed::rss_feed))
        .route("/api/posts", get(blog::list_posts))
        .route("/api/posts/featured", get(blog::featured_post))
        .route("/api/posts/{slug}", get(blog::get_post))

        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())

        // Add shared state
        .with_state(state)
}

/// Browsers may only call the API from the site itself
fn cors_layer(site_root: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match site_root.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(site_root, error = %e, "Site URL is not a valid origin, CORS disabled");
            layer
        }
    }
}
