#![allow(dead_code)]

use channel_stats::services::fallback::FallbackProfile;
use channel_stats::services::snapshot_cache::SnapshotCache;
use channel_stats::services::stats_service::ChannelStatsService;
use channel_stats::services::youtube_client::{
    ChannelListResponse, SearchListResponse, VideoDetailsListResponse, VideoPlatform,
    VideoStatisticsListResponse,
};
use channel_stats::StatsError;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What the fake channel lookup answers with.
#[derive(Clone)]
pub enum ChannelAnswer {
    Found { subscribers: u64 },
    Empty,
    Status(u16),
    Quota,
}

/// In-memory stand-in for the YouTube Data API.
pub struct FakePlatform {
    pub configured: bool,
    pub channel: ChannelAnswer,
    /// `(video id, ISO8601 duration)` in search order.
    pub videos: Vec<(String, String)>,
    pub search_fails: bool,
    pub statistics_fail: bool,
    /// Ids the details call leaves out.
    pub missing_details: Vec<String>,
    pub channel_delay: Option<Duration>,
    pub channel_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    pub statistics_calls: AtomicUsize,
}

impl FakePlatform {
    pub fn new(channel: ChannelAnswer, videos: &[(&str, &str)]) -> Self {
        FakePlatform {
            configured: true,
            channel,
            videos: videos
                .iter()
                .map(|(id, duration)| (id.to_string(), duration.to_string()))
                .collect(),
            search_fails: false,
            statistics_fail: false,
            missing_details: Vec::new(),
            channel_delay: None,
            channel_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            details_calls: AtomicUsize::new(0),
            statistics_calls: AtomicUsize::new(0),
        }
    }

    pub fn channel_calls(&self) -> usize {
        self.channel_calls.load(Ordering::SeqCst)
    }
}

#[rocket::async_trait]
impl VideoPlatform for FakePlatform {
    fn ensure_configured(&self) -> Result<(), StatsError> {
        if self.configured {
            Ok(())
        } else {
            Err(StatsError::Configuration(
                "YOUTUBE_API_KEY is not set".to_string(),
            ))
        }
    }

    async fn fetch_channel(&self) -> Result<ChannelListResponse, StatsError> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.channel_delay {
            tokio::time::sleep(delay).await;
        }

        match &self.channel {
            ChannelAnswer::Found { subscribers } => Ok(serde_json::from_value(json!({
                "items": [{
                    "id": "UC_test",
                    "snippet": {
                        "title": "Test Channel",
                        "thumbnails": {"high": {"url": "https://img.example/channel.jpg"}}
                    },
                    "statistics": {
                        "subscriberCount": subscribers.to_string(),
                        "viewCount": "987654",
                        "videoCount": "87"
                    }
                }]
            }))?),
            ChannelAnswer::Empty => Ok(serde_json::from_value(json!({ "items": [] }))?),
            ChannelAnswer::Status(status) => Err(StatsError::Upstream {
                status: *status,
                message: "Backend Error".to_string(),
            }),
            ChannelAnswer::Quota => Err(StatsError::QuotaExceeded(
                "The request cannot be completed because you have exceeded your quota."
                    .to_string(),
            )),
        }
    }

    async fn search_recent_videos(&self) -> Result<SearchListResponse, StatsError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.search_fails {
            return Err(StatsError::Upstream {
                status: 500,
                message: "search unavailable".to_string(),
            });
        }

        let items: Vec<_> = self
            .videos
            .iter()
            .enumerate()
            .map(|(i, (id, _))| {
                json!({
                    "id": {"kind": "youtube#video", "videoId": id},
                    "snippet": {
                        "publishedAt": format!("2024-06-{:02}T10:00:00Z", 28 - i),
                        "title": format!("Video {id}"),
                        "description": "",
                        "thumbnails": {"medium": {"url": format!("https://img.example/{id}.jpg")}}
                    }
                })
            })
            .collect();
        Ok(serde_json::from_value(json!({ "items": items }))?)
    }

    async fn fetch_content_details(
        &self,
        video_ids: &[String],
    ) -> Result<VideoDetailsListResponse, StatsError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);

        let items: Vec<_> = self
            .videos
            .iter()
            .filter(|(id, _)| video_ids.contains(id) && !self.missing_details.contains(id))
            .map(|(id, duration)| json!({"id": id, "contentDetails": {"duration": duration}}))
            .collect();
        Ok(serde_json::from_value(json!({ "items": items }))?)
    }

    async fn fetch_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<VideoStatisticsListResponse, StatsError> {
        self.statistics_calls.fetch_add(1, Ordering::SeqCst);
        if self.statistics_fail {
            return Err(StatsError::Decode("unexpected body".to_string()));
        }

        // Reverse order to make sure the merge does not rely on position.
        let items: Vec<_> = video_ids
            .iter()
            .rev()
            .map(|id| json!({"id": id, "statistics": {"viewCount": "1200", "likeCount": "34"}}))
            .collect();
        Ok(serde_json::from_value(json!({ "items": items }))?)
    }
}

pub fn service_with(platform: Arc<FakePlatform>) -> (ChannelStatsService, Arc<SnapshotCache>) {
    let cache = Arc::new(SnapshotCache::default());
    let service = ChannelStatsService::new(platform, cache.clone(), FallbackProfile::default());
    (service, cache)
}
