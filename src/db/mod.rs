use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;

use crate::{error::AppResult, models::WatchEvent};

pub mod memory;
pub mod postgres;
pub mod recent;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};
pub use recent::create_redis_client;

/// Analytics data store abstraction
///
/// Everything the service persists goes through this trait: the append-only
/// activity log, watch history, the per-video and per-(user, category)
/// counters, and the bounded recent-videos list. The recommendation engine
/// only touches the read side; the ingestion path only touches the write
/// side.
///
/// Implementations must keep the per-key counter increments free of lost
/// updates under concurrent ingestion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Distinct video titles the user has watched
    async fn watched_titles(&self, username: &str) -> AppResult<HashSet<String>>;

    /// Distinct users with at least one play of any of the given titles
    ///
    /// The result may include the user whose titles were passed in; callers
    /// filter themselves out.
    async fn users_who_watched(&self, titles: &HashSet<String>) -> AppResult<HashSet<String>>;

    /// All watch events recorded for a title, oldest first
    ///
    /// Used to derive the title's canonical category.
    async fn watch_events_for_title(&self, video_title: &str) -> AppResult<Vec<WatchEvent>>;

    /// The user's per-category view counts
    async fn category_preferences(&self, username: &str) -> AppResult<HashMap<String, i64>>;

    /// Total view count for a title, zero when untracked
    async fn view_count(&self, video_title: &str) -> AppResult<i64>;

    /// The user's most recently watched titles, newest first, at most three
    async fn recent_videos(&self, username: &str) -> AppResult<Vec<String>>;

    /// Appends an entry to the activity log
    async fn record_activity(
        &self,
        username: &str,
        event_type: &str,
        metadata: &Value,
    ) -> AppResult<()>;

    /// Appends a watch-history row
    async fn record_watch(
        &self,
        username: &str,
        video_title: &str,
        category: Option<&str>,
    ) -> AppResult<()>;

    /// Increments a title's view count, creating the row at one if absent
    ///
    /// Returns the count after the increment.
    async fn increment_view_count(&self, video_title: &str) -> AppResult<i64>;

    /// Increments the user's view count for a category, creating it at one
    async fn bump_category_preference(&self, username: &str, category: &str) -> AppResult<()>;

    /// Moves a title to the front of the user's recent-videos list
    ///
    /// The list is de-duplicated by title and trimmed to three entries.
    async fn push_recent_video(&self, username: &str, video_title: &str) -> AppResult<()>;
}
