use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use vod_analytics::api::{create_router, AppState};
use vod_analytics::db::MemoryStore;

fn create_test_server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryStore::new()));
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

async fn track_play(server: &TestServer, username: &str, video: &str, category: Option<&str>) {
    let mut metadata = json!({ "video": video });
    if let Some(category) = category {
        metadata["category"] = json!(category);
    }

    let response = server
        .post("/track")
        .json(&json!({
            "username": username,
            "event_type": "play-video",
            "activity_metadata": metadata,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_track_play_video_updates_view_count() {
    let server = create_test_server();

    track_play(&server, "alice", "Inception", Some("sci-fi")).await;
    track_play(&server, "bob", "Inception", Some("sci-fi")).await;

    let response = server.get("/video-view-count/Inception").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["video_title"], "Inception");
    assert_eq!(body["view_count"], 2);
}

#[tokio::test]
async fn test_view_count_defaults_to_zero_for_untracked_video() {
    let server = create_test_server();

    let response = server.get("/video-view-count/Unknown%20Video").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["video_title"], "Unknown Video");
    assert_eq!(body["view_count"], 0);
}

#[tokio::test]
async fn test_recommendations_empty_without_history() {
    let server = create_test_server();

    let response = server.get("/recommendations/alice").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_recommendation_flow() {
    let server = create_test_server();

    // alice builds a drama preference from her own plays
    track_play(&server, "alice", "A", Some("drama")).await;
    track_play(&server, "alice", "B", Some("drama")).await;

    // bob shares {A,B} with alice and adds C (drama) and D (comedy)
    track_play(&server, "bob", "A", Some("drama")).await;
    track_play(&server, "bob", "B", Some("drama")).await;
    track_play(&server, "bob", "C", Some("drama")).await;
    track_play(&server, "bob", "D", Some("comedy")).await;

    // carol shares only A and adds E
    track_play(&server, "carol", "A", Some("drama")).await;
    track_play(&server, "carol", "E", Some("comedy")).await;

    // Raw scores: C=2, D=2, E=1. Alice's drama weight (2) lifts C to 3.
    let response = server.get("/recommendations/alice").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"], json!(["C", "D", "E"]));

    // Recommendations never include titles alice already watched
    let recommended = body["recommendations"].as_array().unwrap();
    assert!(!recommended.contains(&json!("A")));
    assert!(!recommended.contains(&json!("B")));
}

#[tokio::test]
async fn test_recent_videos_bounded_and_most_recent_first() {
    let server = create_test_server();

    for video in ["A", "B", "C", "D"] {
        track_play(&server, "bob", video, None).await;
    }

    let response = server.get("/recent-videos/bob").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "bob");
    assert_eq!(body["recent_videos"], json!(["D", "C", "B"]));

    // Replaying a listed title moves it to the front without duplicating it
    track_play(&server, "bob", "B", None).await;

    let response = server.get("/recent-videos/bob").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["recent_videos"], json!(["B", "D", "C"]));
}

#[tokio::test]
async fn test_track_rejects_play_event_without_video() {
    let server = create_test_server();

    let response = server
        .post("/track")
        .json(&json!({
            "username": "alice",
            "event_type": "play-video",
            "activity_metadata": { "category": "drama" },
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_track_non_play_event_leaves_read_models_untouched() {
    let server = create_test_server();

    let response = server
        .post("/track")
        .json(&json!({
            "username": "alice",
            "event_type": "log_out",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let response = server.get("/recent-videos/alice").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["recent_videos"], json!([]));

    let response = server.get("/recommendations/alice").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_request_id_echoed_on_response() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(!response.header("x-request-id").is_empty());
}
