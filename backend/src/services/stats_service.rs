use crate::error::StatsError;
use crate::models::{ChannelSnapshot, LongFormPage};
use crate::services::aggregator::aggregate_snapshot;
use crate::services::fallback::FallbackProfile;
use crate::services::snapshot_cache::SnapshotStore;
use crate::services::youtube_client::VideoPlatform;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_PAGE_SIZE: usize = 9;
pub const MAX_PAGE_SIZE: usize = 50;

pub struct ChannelStatsService {
    platform: Arc<dyn VideoPlatform>,
    cache: Arc<dyn SnapshotStore>,
    fallback: FallbackProfile,
    refresh_lock: Mutex<()>,
}

impl ChannelStatsService {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        cache: Arc<dyn SnapshotStore>,
        fallback: FallbackProfile,
    ) -> Self {
        ChannelStatsService {
            platform,
            cache,
            fallback,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn channel_stats(&self) -> Result<ChannelSnapshot, StatsError> {
        self.channel_stats_at(Utc::now()).await
    }

    /// Serves the cached snapshot while fresh, otherwise aggregates a new one.
    /// Every upstream failure yields the degraded fallback; only missing
    /// configuration is returned as an error.
    pub async fn channel_stats_at(&self, now: DateTime<Utc>) -> Result<ChannelSnapshot, StatsError> {
        self.platform.ensure_configured()?;

        if let Some(snapshot) = self.cache.get(now) {
            debug!("Serving cached channel snapshot from {}", snapshot.computed_at);
            return Ok(snapshot);
        }

        let _refresh = self.refresh_lock.lock().await;

        // Another request may have refreshed the cache while we waited.
        if let Some(snapshot) = self.cache.get(now) {
            return Ok(snapshot);
        }

        let snapshot = match aggregate_snapshot(self.platform.as_ref(), now).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_configuration() => return Err(e),
            Err(StatsError::QuotaExceeded(message)) => {
                warn!("YouTube API quota exhausted, serving fallback snapshot: {message}");
                self.fallback.snapshot(now)
            }
            Err(e) => {
                error!("Channel aggregation failed, serving fallback snapshot: {e}");
                self.fallback.snapshot(now)
            }
        };

        if snapshot.degraded {
            info!("Caching degraded channel snapshot");
        }
        self.cache.put(snapshot.clone());

        Ok(snapshot)
    }

    pub async fn long_form_page(
        &self,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> Result<LongFormPage, StatsError> {
        let snapshot = self.channel_stats().await?;
        Ok(paginate_long_form(&snapshot, page, per_page))
    }
}

/// `page` is 1-based; out-of-range pages are empty.
pub fn paginate_long_form(
    snapshot: &ChannelSnapshot,
    page: Option<usize>,
    per_page: Option<usize>,
) -> LongFormPage {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let total = snapshot.all_long_form_videos.len();
    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    LongFormPage {
        videos: snapshot.all_long_form_videos[start..end].to_vec(),
        total,
        page,
        per_page,
        has_more: end < total,
        degraded: snapshot.degraded,
    }
}
