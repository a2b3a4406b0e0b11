use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
///
/// CORS is permissive; the frontend is served from a different origin and
/// the platform's gateway handles authentication.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Ingestion
        .route("/track", post(handlers::track_event))
        // Read models
        .route("/recommendations/:username", get(handlers::recommendations))
        .route("/video-view-count/:video_title", get(handlers::video_view_count))
        .route("/recent-videos/:username", get(handlers::recent_videos))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
