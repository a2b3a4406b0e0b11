use crate::{
    db::AnalyticsStore,
    error::AppResult,
    models::{PlayVideoMetadata, TrackRequest, PLAY_VIDEO_EVENT},
};

/// Processes one tracked activity event
///
/// Every event is appended to the activity log. Play events additionally
/// feed the read models the recommendation engine and the video pages
/// consume: the watch-history row, the video's view count, the user's
/// category preference, and the recent-videos list. The metadata is
/// validated up front, so a malformed play event writes nothing.
pub async fn process_event(store: &dyn AnalyticsStore, request: TrackRequest) -> AppResult<()> {
    if request.event_type != PLAY_VIDEO_EVENT {
        store
            .record_activity(&request.username, &request.event_type, &request.activity_metadata)
            .await?;
        tracing::debug!(
            username = %request.username,
            event_type = %request.event_type,
            "Activity recorded"
        );
        return Ok(());
    }

    let metadata = PlayVideoMetadata::from_value(&request.activity_metadata)?;

    store
        .record_activity(&request.username, &request.event_type, &request.activity_metadata)
        .await?;
    store
        .record_watch(&request.username, &metadata.video, metadata.category.as_deref())
        .await?;
    let view_count = store.increment_view_count(&metadata.video).await?;
    if let Some(category) = metadata.category.as_deref() {
        store
            .bump_category_preference(&request.username, category)
            .await?;
    }
    store
        .push_recent_video(&request.username, &metadata.video)
        .await?;

    tracing::info!(
        username = %request.username,
        video = %metadata.video,
        view_count,
        "Play event ingested"
    );

    Ok(())
}
