use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::TrackRequest;
use crate::services::{ingestion, recommendation};

use super::AppState;

// Response types

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub username: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewCountResponse {
    pub video_title: String,
    pub view_count: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentVideosResponse {
    pub username: String,
    pub recent_videos: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Records a user activity event
pub async fn track_event(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> AppResult<(StatusCode, Json<TrackResponse>)> {
    ingestion::process_event(state.store.as_ref(), request).await?;

    Ok((
        StatusCode::CREATED,
        Json(TrackResponse {
            message: "Activity recorded".to_string(),
        }),
    ))
}

/// Returns up to three recommended video titles for a user
///
/// Always 200; the list is empty when the user has no usable signal.
pub async fn recommendations(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<RecommendationsResponse>> {
    let recommendations = recommendation::recommend(state.store.as_ref(), &username).await?;

    Ok(Json(RecommendationsResponse {
        username,
        recommendations,
    }))
}

/// Returns a video's total view count, zero when untracked
pub async fn video_view_count(
    State(state): State<AppState>,
    Path(video_title): Path<String>,
) -> AppResult<Json<ViewCountResponse>> {
    let view_count = state.store.view_count(&video_title).await?;

    Ok(Json(ViewCountResponse {
        video_title,
        view_count,
    }))
}

/// Returns the user's three most recently watched titles, newest first
pub async fn recent_videos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<RecentVideosResponse>> {
    let recent_videos = state.store.recent_videos(&username).await?;

    Ok(Json(RecentVideosResponse {
        username,
        recent_videos,
    }))
}
