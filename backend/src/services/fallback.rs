use crate::models::ChannelSnapshot;
use chrono::{DateTime, Utc};

/// Last known-good channel numbers, served while the YouTube API is unavailable.
#[derive(Debug, Clone)]
pub struct FallbackProfile {
    pub channel_title: String,
    pub channel_thumbnail_url: String,
    pub subscriber_count: u64,
    pub total_view_count: u64,
    pub total_video_count: u64,
}

impl Default for FallbackProfile {
    fn default() -> Self {
        FallbackProfile {
            channel_title: "Channel".to_string(),
            channel_thumbnail_url: String::new(),
            subscriber_count: 3_500,
            total_view_count: 250_000,
            total_video_count: 120,
        }
    }
}

impl FallbackProfile {
    /// Degraded snapshots carry channel totals only; per-video data is never
    /// served from the static profile.
    pub fn snapshot(&self, now: DateTime<Utc>) -> ChannelSnapshot {
        ChannelSnapshot {
            channel_title: self.channel_title.clone(),
            channel_thumbnail_url: self.channel_thumbnail_url.clone(),
            subscriber_count: self.subscriber_count,
            total_view_count: self.total_view_count,
            total_video_count: self.total_video_count,
            short_form_count: 0,
            long_form_count: 0,
            recent_long_form_videos: Vec::new(),
            recent_short_form_videos: Vec::new(),
            all_long_form_videos: Vec::new(),
            computed_at: now,
            degraded: true,
        }
    }
}
