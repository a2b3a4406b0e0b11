use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{ActivityRecord, WatchEvent},
};

use super::{recent::RECENT_VIDEOS_LIMIT, AnalyticsStore};

/// In-memory analytics store
///
/// Backs the integration tests and infrastructure-free local runs. Every
/// write takes the single write lock for its whole mutation, which gives the
/// same lost-update-free counter semantics as the Postgres upserts.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    activities: Vec<ActivityRecord>,
    watch_history: Vec<WatchEvent>,
    view_counts: HashMap<String, i64>,
    category_preferences: HashMap<(String, String), i64>,
    recent_videos: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of activity-log entries recorded so far
    pub async fn activity_count(&self) -> usize {
        self.inner.read().await.activities.len()
    }
}

#[async_trait::async_trait]
impl AnalyticsStore for MemoryStore {
    async fn watched_titles(&self, username: &str) -> AppResult<HashSet<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watch_history
            .iter()
            .filter(|event| event.username == username)
            .map(|event| event.video_title.clone())
            .collect())
    }

    async fn users_who_watched(&self, titles: &HashSet<String>) -> AppResult<HashSet<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watch_history
            .iter()
            .filter(|event| titles.contains(&event.video_title))
            .map(|event| event.username.clone())
            .collect())
    }

    async fn watch_events_for_title(&self, video_title: &str) -> AppResult<Vec<WatchEvent>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watch_history
            .iter()
            .filter(|event| event.video_title == video_title)
            .cloned()
            .collect())
    }

    async fn category_preferences(&self, username: &str) -> AppResult<HashMap<String, i64>> {
        let inner = self.inner.read().await;
        Ok(inner
            .category_preferences
            .iter()
            .filter(|((user, _), _)| user == username)
            .map(|((_, category), count)| (category.clone(), *count))
            .collect())
    }

    async fn view_count(&self, video_title: &str) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.view_counts.get(video_title).copied().unwrap_or(0))
    }

    async fn recent_videos(&self, username: &str) -> AppResult<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner.recent_videos.get(username).cloned().unwrap_or_default())
    }

    async fn record_activity(
        &self,
        username: &str,
        event_type: &str,
        metadata: &Value,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.activities.push(ActivityRecord {
            username: username.to_string(),
            event_type: event_type.to_string(),
            activity_metadata: metadata.clone(),
            recorded_at: Utc::now(),
        });
        Ok(())
    }

    async fn record_watch(
        &self,
        username: &str,
        video_title: &str,
        category: Option<&str>,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .watch_history
            .push(WatchEvent::new(username, video_title, category));
        Ok(())
    }

    async fn increment_view_count(&self, video_title: &str) -> AppResult<i64> {
        let mut inner = self.inner.write().await;
        let count = inner
            .view_counts
            .entry(video_title.to_string())
            .or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn bump_category_preference(&self, username: &str, category: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        *inner
            .category_preferences
            .entry((username.to_string(), category.to_string()))
            .or_insert(0) += 1;
        Ok(())
    }

    async fn push_recent_video(&self, username: &str, video_title: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let list = inner
            .recent_videos
            .entry(username.to_string())
            .or_default();
        list.retain(|title| title != video_title);
        list.insert(0, video_title.to_string());
        list.truncate(RECENT_VIDEOS_LIMIT);
        Ok(())
    }
}
