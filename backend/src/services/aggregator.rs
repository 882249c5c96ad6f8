use crate::error::StatsError;
use crate::models::ChannelSnapshot;
use crate::services::classifier::{build_snapshot, UpstreamData};
use crate::services::youtube_client::{SearchItem, VideoPlatform};
use chrono::{DateTime, Utc};
use log::{info, warn};

/// Runs the four upstream reads and merges them.
///
/// Only the channel lookup is mandatory. Search, content details and
/// statistics degrade to empty data on failure.
pub async fn aggregate_snapshot(
    platform: &dyn VideoPlatform,
    now: DateTime<Utc>,
) -> Result<ChannelSnapshot, StatsError> {
    platform.ensure_configured()?;

    let channel = platform
        .fetch_channel()
        .await?
        .items
        .into_iter()
        .next()
        .ok_or_else(|| StatsError::NotFound("channel lookup returned no items".to_string()))?;

    let search_items = match platform.search_recent_videos().await {
        Ok(response) => response.items,
        Err(e) => {
            warn!("Recent video search failed, continuing without videos: {e}");
            Vec::new()
        }
    };

    let video_ids = collect_video_ids(&search_items);
    let (details, statistics) = if video_ids.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let (details, statistics) = tokio::join!(
            platform.fetch_content_details(&video_ids),
            platform.fetch_statistics(&video_ids)
        );

        let details = details.map(|r| r.items).unwrap_or_else(|e| {
            warn!("Content details fetch failed: {e}");
            Vec::new()
        });
        let statistics = statistics.map(|r| r.items).unwrap_or_else(|e| {
            warn!("Video statistics fetch failed: {e}");
            Vec::new()
        });
        (details, statistics)
    };

    let snapshot = build_snapshot(
        UpstreamData {
            channel,
            search_items,
            details,
            statistics,
        },
        now,
    );

    info!(
        "Aggregated channel '{}': {} subscribers, {} long-form, {} short-form",
        snapshot.channel_title,
        snapshot.subscriber_count,
        snapshot.long_form_count,
        snapshot.short_form_count
    );

    Ok(snapshot)
}

/// Video ids in search order, without duplicates.
fn collect_video_ids(items: &[SearchItem]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(items.len());
    for id in items.iter().filter_map(SearchItem::video_id) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
