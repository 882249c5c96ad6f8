use anyhow::Result;
use chrono::Duration;
use env_logger::{Builder, Env};
use log::info;
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u32 = 10;
const MAX_UPSTREAM_TIMEOUT_SECS: u32 = 120;
const DEFAULT_CACHE_LIVE_SECS: u32 = 30 * 60;
const DEFAULT_CACHE_DEGRADED_SECS: u32 = 10 * 60;
const MAX_CACHE_SECS: u32 = 7 * 24 * 60 * 60;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Freshness windows of the snapshot cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheWindows {
    pub live: Duration,
    pub degraded: Duration,
}

impl Default for CacheWindows {
    fn default() -> Self {
        CacheWindows {
            live: Duration::seconds(i64::from(DEFAULT_CACHE_LIVE_SECS)),
            degraded: Duration::seconds(i64::from(DEFAULT_CACHE_DEGRADED_SECS)),
        }
    }
}

impl CacheWindows {
    pub fn for_snapshot(&self, degraded: bool) -> Duration {
        if degraded {
            self.degraded
        } else {
            self.live
        }
    }
}

#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    pub api_key: Option<String>,
    pub channel_id: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        YouTubeSettings {
            api_key: None,
            channel_id: None,
            base_url: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
            timeout_secs: u64::from(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub youtube: YouTubeSettings,
    pub cache: CacheWindows,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Reads the environment. Missing credentials are kept as `None` so the
    /// endpoint can report them per request instead of refusing to start.
    pub fn from_env() -> Self {
        let youtube = YouTubeSettings {
            api_key: non_blank_var("YOUTUBE_API_KEY"),
            channel_id: non_blank_var("YOUTUBE_CHANNEL_ID"),
            base_url: non_blank_var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string()),
            timeout_secs: u64::from(bounded_secs(
                non_blank_var("UPSTREAM_TIMEOUT_SECS"),
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
                MAX_UPSTREAM_TIMEOUT_SECS,
            )),
        };

        let cache = CacheWindows {
            live: Duration::seconds(i64::from(bounded_secs(
                non_blank_var("CACHE_LIVE_SECS"),
                DEFAULT_CACHE_LIVE_SECS,
                MAX_CACHE_SECS,
            ))),
            degraded: Duration::seconds(i64::from(bounded_secs(
                non_blank_var("CACHE_DEGRADED_SECS"),
                DEFAULT_CACHE_DEGRADED_SECS,
                MAX_CACHE_SECS,
            ))),
        };

        let cors_origins = non_blank_var("CORS_ALLOWED_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        Settings {
            youtube,
            cache,
            cors_origins,
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Seconds in `1..=max`; anything else (zero, negative, garbage, huge) falls
/// back to `default`.
fn bounded_secs(value: Option<String>, default: u32, max: u32) -> u32 {
    value
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|secs| (1..=max).contains(secs))
        .unwrap_or(default)
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

pub fn init_logger() {
    // Only the first logger sticks; Rocket and test binaries may try again.
    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
    info!("Starting channel stats backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_http_client(settings: &YouTubeSettings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(settings.timeout_secs))
        .build()?;

    Ok(client)
}

pub fn create_cors(origins: &[String]) -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(origins))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
