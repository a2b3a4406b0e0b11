use std::collections::{HashMap, HashSet};

use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{error::AppResult, models::WatchEvent};

use super::{recent, AnalyticsStore};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed analytics store
///
/// Watch history, the activity log, and both counters live in Postgres; the
/// recent-videos list lives in Redis, where the remove/push/trim sequence
/// runs as one atomic pipeline. Counter updates are single-statement
/// `ON CONFLICT` upserts so concurrent ingestion cannot lose increments.
pub struct PgStore {
    pool: PgPool,
    redis_client: redis::Client,
}

impl PgStore {
    pub fn new(pool: PgPool, redis_client: redis::Client) -> Self {
        Self { pool, redis_client }
    }
}

#[async_trait::async_trait]
impl AnalyticsStore for PgStore {
    async fn watched_titles(&self, username: &str) -> AppResult<HashSet<String>> {
        let titles: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT video_title FROM watch_history WHERE username = $1")
                .bind(username)
                .fetch_all(&self.pool)
                .await?;

        Ok(titles.into_iter().collect())
    }

    async fn users_who_watched(&self, titles: &HashSet<String>) -> AppResult<HashSet<String>> {
        if titles.is_empty() {
            return Ok(HashSet::new());
        }

        let titles: Vec<String> = titles.iter().cloned().collect();
        let users: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT username FROM watch_history WHERE video_title = ANY($1)")
                .bind(&titles)
                .fetch_all(&self.pool)
                .await?;

        Ok(users.into_iter().collect())
    }

    async fn watch_events_for_title(&self, video_title: &str) -> AppResult<Vec<WatchEvent>> {
        let events = sqlx::query_as::<_, WatchEvent>(
            "SELECT username, video_title, category, watched_at \
             FROM watch_history WHERE video_title = $1 ORDER BY watched_at",
        )
        .bind(video_title)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn category_preferences(&self, username: &str) -> AppResult<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, view_count FROM category_preferences WHERE username = $1")
                .bind(username)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }

    async fn view_count(&self, video_title: &str) -> AppResult<i64> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT view_count FROM video_view_counts WHERE video_title = $1")
                .bind(video_title)
                .fetch_optional(&self.pool)
                .await?;

        Ok(count.unwrap_or(0))
    }

    async fn recent_videos(&self, username: &str) -> AppResult<Vec<String>> {
        recent::fetch_recent(&self.redis_client, username).await
    }

    async fn record_activity(
        &self,
        username: &str,
        event_type: &str,
        metadata: &Value,
    ) -> AppResult<()> {
        let metadata = if metadata.is_null() { None } else { Some(metadata.clone()) };

        sqlx::query(
            "INSERT INTO user_activities (username, event_type, activity_metadata) VALUES ($1, $2, $3)",
        )
        .bind(username)
        .bind(event_type)
        .bind(metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_watch(
        &self,
        username: &str,
        video_title: &str,
        category: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO watch_history (username, video_title, category) VALUES ($1, $2, $3)")
            .bind(username)
            .bind(video_title)
            .bind(category)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn increment_view_count(&self, video_title: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "INSERT INTO video_view_counts (video_title, view_count) VALUES ($1, 1) \
             ON CONFLICT (video_title) \
             DO UPDATE SET view_count = video_view_counts.view_count + 1 \
             RETURNING view_count",
        )
        .bind(video_title)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn bump_category_preference(&self, username: &str, category: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO category_preferences (username, category, view_count) VALUES ($1, $2, 1) \
             ON CONFLICT (username, category) \
             DO UPDATE SET view_count = category_preferences.view_count + 1",
        )
        .bind(username)
        .bind(category)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn push_recent_video(&self, username: &str, video_title: &str) -> AppResult<()> {
        recent::push_recent(&self.redis_client, username, video_title).await
    }
}
