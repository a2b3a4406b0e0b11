use redis::{AsyncCommands, Client};

use crate::error::AppResult;

/// Upper bound on the recent-videos list kept per user
pub const RECENT_VIDEOS_LIMIT: usize = 3;

/// Creates a Redis client for the recent-videos lists
///
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

fn recent_key(username: &str) -> String {
    format!("recent:{}", username)
}

/// Moves a title to the front of the user's recent list
///
/// The remove/push/trim sequence runs as one MULTI/EXEC pipeline, so two
/// racing plays from the same user cannot interleave and corrupt the list.
pub async fn push_recent(client: &Client, username: &str, video_title: &str) -> AppResult<()> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let key = recent_key(username);

    redis::pipe()
        .atomic()
        .lrem(&key, 0, video_title)
        .ignore()
        .lpush(&key, video_title)
        .ignore()
        .ltrim(&key, 0, RECENT_VIDEOS_LIMIT as isize - 1)
        .ignore()
        .query_async::<_, ()>(&mut conn)
        .await?;

    Ok(())
}

/// Reads the user's recent list, newest first
pub async fn fetch_recent(client: &Client, username: &str) -> AppResult<Vec<String>> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let titles: Vec<String> = conn
        .lrange(recent_key(username), 0, RECENT_VIDEOS_LIMIT as isize - 1)
        .await?;

    Ok(titles)
}
