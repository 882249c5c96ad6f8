#[macro_use]
extern crate rocket;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::Settings;
use crate::services::fallback::FallbackProfile;
use crate::services::snapshot_cache::SnapshotCache;
use crate::services::stats_service::ChannelStatsService;
use crate::services::youtube_client::YouTubeApiClient;
use rocket::{Build, Rocket};
use std::sync::Arc;

pub use crate::error::StatsError;
pub use crate::models::{ChannelSnapshot, VideoSummary};

pub struct AppState {
    pub stats_service: Arc<ChannelStatsService>,
}

#[get("/")]
fn index() -> &'static str {
    "channel stats backend"
}

pub fn create_app_state(settings: &Settings) -> anyhow::Result<AppState> {
    let client = config::create_http_client(&settings.youtube)?;
    let platform = Arc::new(YouTubeApiClient::new(client, settings.youtube.clone()));
    let cache = Arc::new(SnapshotCache::new(settings.cache));

    Ok(AppState {
        stats_service: Arc::new(ChannelStatsService::new(
            platform,
            cache,
            FallbackProfile::default(),
        )),
    })
}

/// Mounts every route on a fresh Rocket instance; CORS is attached by the binary.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![index])
        .mount(
            "/channel-stats",
            routes![api::channel_stats, api::long_form_videos],
        )
}
