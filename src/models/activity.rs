use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Event type that feeds the watch-history pipeline
///
/// Every other event type ("log_out", "upload", ...) only lands in the
/// activity log.
pub const PLAY_VIDEO_EVENT: &str = "play-video";

/// Body of `POST /track`
///
/// `activity_metadata` is free-form JSON; its shape depends on the event
/// type, so it is kept dynamic here and re-parsed into [`PlayVideoMetadata`]
/// at ingestion for play events.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRequest {
    pub username: String,
    pub event_type: String,
    #[serde(default)]
    pub activity_metadata: Value,
}

/// A persisted activity-log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub username: String,
    pub event_type: String,
    pub activity_metadata: Value,
    pub recorded_at: DateTime<Utc>,
}

/// Typed view of the metadata attached to a play-video event
///
/// `video` is required and must be non-empty; an empty `category` is
/// normalized to `None` so the rest of the pipeline never sees blank
/// categories. Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayVideoMetadata {
    pub video: String,
    #[serde(default)]
    pub video_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PlayVideoMetadata {
    /// Parses and validates play-video metadata
    pub fn from_value(metadata: &Value) -> AppResult<Self> {
        let mut parsed: PlayVideoMetadata = serde_json::from_value(metadata.clone())
            .map_err(|e| AppError::InvalidInput(format!("Invalid play-video metadata: {}", e)))?;

        if parsed.video.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "play-video event is missing a video title".to_string(),
            ));
        }

        if let Some(category) = &parsed.category {
            if category.trim().is_empty() {
                parsed.category = None;
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_play_metadata_full() {
        let value = json!({"video": "Inception", "video_id": 42, "category": "Sci-Fi"});
        let parsed = PlayVideoMetadata::from_value(&value).unwrap();
        assert_eq!(parsed.video, "Inception");
        assert_eq!(parsed.video_id, Some(42));
        assert_eq!(parsed.category.as_deref(), Some("Sci-Fi"));
    }

    #[test]
    fn test_play_metadata_video_only() {
        let value = json!({"video": "Inception"});
        let parsed = PlayVideoMetadata::from_value(&value).unwrap();
        assert_eq!(parsed.video, "Inception");
        assert_eq!(parsed.video_id, None);
        assert_eq!(parsed.category, None);
    }

    #[test]
    fn test_play_metadata_ignores_extra_fields() {
        let value = json!({"video": "Inception", "player": "hls", "position": 12.5});
        let parsed = PlayVideoMetadata::from_value(&value).unwrap();
        assert_eq!(parsed.video, "Inception");
    }

    #[test]
    fn test_play_metadata_missing_video_rejected() {
        let value = json!({"category": "Sci-Fi"});
        let result = PlayVideoMetadata::from_value(&value);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_play_metadata_empty_video_rejected() {
        let value = json!({"video": "   "});
        let result = PlayVideoMetadata::from_value(&value);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_play_metadata_blank_category_normalized() {
        let value = json!({"video": "Inception", "category": ""});
        let parsed = PlayVideoMetadata::from_value(&value).unwrap();
        assert_eq!(parsed.category, None);
    }

    #[test]
    fn test_track_request_defaults_metadata_to_null() {
        let request: TrackRequest =
            serde_json::from_value(json!({"username": "alice", "event_type": "log_out"})).unwrap();
        assert_eq!(request.activity_metadata, Value::Null);
    }
}
