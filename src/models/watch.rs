use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single play of a video by a user
///
/// Multiple events per (username, video_title) pair are expected; the
/// recommendation engine treats presence, not count, as the watched signal.
/// `category` mirrors whatever the client sent at play time and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchEvent {
    pub username: String,
    pub video_title: String,
    pub category: Option<String>,
    pub watched_at: DateTime<Utc>,
}

impl WatchEvent {
    /// Creates an event stamped with the current time
    pub fn new(username: &str, video_title: &str, category: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            video_title: video_title.to_string(),
            category: category.map(str::to_string),
            watched_at: Utc::now(),
        }
    }
}
