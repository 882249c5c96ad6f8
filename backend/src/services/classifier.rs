use crate::models::{
    ChannelSnapshot, VideoFormat, VideoSummary, RECENT_LONG_FORM_LIMIT, RECENT_SHORT_FORM_LIMIT,
};
use crate::services::youtube_client::{
    ChannelResource, SearchItem, VideoDetailsItem, VideoStatistics, VideoStatisticsItem,
};
use crate::utils::{format_duration, parse_iso8601_duration_to_seconds, parse_iso8601_to_timestamp};
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;

/// Raw result sets of one aggregation run, in upstream order.
#[derive(Debug, Default)]
pub struct UpstreamData {
    pub channel: ChannelResource,
    pub search_items: Vec<SearchItem>,
    pub details: Vec<VideoDetailsItem>,
    pub statistics: Vec<VideoStatisticsItem>,
}

/// Joins the four result sets into one snapshot.
///
/// Details and statistics are looked up by video id. Videos without a details
/// entry are dropped; missing statistics count as zero. Search order (newest
/// first) is kept for every list.
pub fn build_snapshot(data: UpstreamData, now: DateTime<Utc>) -> ChannelSnapshot {
    let durations: HashMap<&str, u64> = data
        .details
        .iter()
        .map(|item| {
            (
                item.id.as_str(),
                parse_iso8601_duration_to_seconds(&item.content_details.duration),
            )
        })
        .collect();
    let statistics: HashMap<&str, &VideoStatistics> = data
        .statistics
        .iter()
        .map(|item| (item.id.as_str(), &item.statistics))
        .collect();

    let mut long_form = Vec::new();
    let mut short_form = Vec::new();
    let mut seen = Vec::<&str>::new();

    for item in &data.search_items {
        let Some(video_id) = item.video_id() else {
            continue;
        };
        if seen.contains(&video_id) {
            continue;
        }
        seen.push(video_id);

        let Some(&duration_seconds) = durations.get(video_id) else {
            debug!("Dropping video {video_id}: no content details returned");
            continue;
        };

        let (view_count, like_count) = statistics
            .get(video_id)
            .map(|s| (s.view_count, s.like_count))
            .unwrap_or((0, 0));

        let summary = VideoSummary {
            id: video_id.to_string(),
            title: item.snippet.title.clone(),
            description: item.snippet.description.clone(),
            thumbnail_url: item.snippet.thumbnails.best_url(),
            published_at: parse_iso8601_to_timestamp(&item.snippet.published_at)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            duration_seconds,
            duration_display: format_duration(duration_seconds),
            view_count,
            like_count,
        };

        match VideoFormat::classify(duration_seconds) {
            VideoFormat::Short => short_form.push(summary),
            VideoFormat::Long => long_form.push(summary),
        }
    }

    let short_form_count = short_form.len() as u64;
    let long_form_count = long_form.len() as u64;
    let recent_long_form_videos: Vec<VideoSummary> =
        long_form.iter().take(RECENT_LONG_FORM_LIMIT).cloned().collect();
    short_form.truncate(RECENT_SHORT_FORM_LIMIT);

    let channel = data.channel;
    ChannelSnapshot {
        channel_title: channel.snippet.title.clone(),
        channel_thumbnail_url: channel.snippet.thumbnails.best_url(),
        subscriber_count: channel.statistics.subscriber_count,
        total_view_count: channel.statistics.view_count,
        total_video_count: channel.statistics.video_count,
        short_form_count,
        long_form_count,
        recent_long_form_videos,
        recent_short_form_videos: short_form,
        all_long_form_videos: long_form,
        computed_at: now,
        degraded: false,
    }
}
