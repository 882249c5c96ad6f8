use crate::config::YouTubeSettings;
use crate::error::StatsError;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

const SEARCH_MAX_RESULTS: &str = "50";
const QUOTA_REASONS: [&str; 3] = ["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded"];

// Documentation: https://developers.google.com/youtube/v3/docs

/// The platform transmits counts as decimal strings; absent or malformed
/// values become 0.
fn count_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    pub fn best_url(&self) -> String {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.clone())
            .find(|url| !url.is_empty())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, deserialize_with = "count_from_string")]
    pub subscriber_count: u64,
    #[serde(default, deserialize_with = "count_from_string")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "count_from_string")]
    pub video_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: SearchResultId,
    #[serde(default)]
    pub snippet: SearchSnippet,
}

impl SearchItem {
    pub fn video_id(&self) -> Option<&str> {
        self.id.video_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetailsItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoDetailsListResponse {
    #[serde(default)]
    pub items: Vec<VideoDetailsItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "count_from_string")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "count_from_string")]
    pub like_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStatisticsItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoStatisticsListResponse {
    #[serde(default)]
    pub items: Vec<VideoStatisticsItem>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorReason {
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorReason>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

/// Turns a non-success response body into the matching error.
pub fn classify_error_body(status: u16, body: &str) -> StatsError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message: String = if parsed.error.message.is_empty() {
        body.chars().take(200).collect()
    } else {
        parsed.error.message
    };

    let quota = status == 403
        && parsed
            .error
            .errors
            .iter()
            .any(|e| QUOTA_REASONS.contains(&e.reason.as_str()));

    if quota {
        StatsError::QuotaExceeded(message)
    } else {
        StatsError::Upstream { status, message }
    }
}

/// The four reads the aggregator needs from the video platform.
#[rocket::async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Fails with `StatsError::Configuration` when credentials are missing.
    fn ensure_configured(&self) -> Result<(), StatsError> {
        Ok(())
    }

    async fn fetch_channel(&self) -> Result<ChannelListResponse, StatsError>;

    async fn search_recent_videos(&self) -> Result<SearchListResponse, StatsError>;

    async fn fetch_content_details(
        &self,
        video_ids: &[String],
    ) -> Result<VideoDetailsListResponse, StatsError>;

    async fn fetch_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<VideoStatisticsListResponse, StatsError>;
}

pub struct YouTubeApiClient {
    client: Client,
    settings: YouTubeSettings,
}

struct Credentials<'a> {
    api_key: &'a str,
    channel_id: &'a str,
}

impl YouTubeApiClient {
    pub fn new(client: Client, settings: YouTubeSettings) -> Self {
        YouTubeApiClient { client, settings }
    }

    fn credentials(&self) -> Result<Credentials<'_>, StatsError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| StatsError::Configuration("YOUTUBE_API_KEY is not set".to_string()))?;
        let channel_id = self.settings.channel_id.as_deref().ok_or_else(|| {
            StatsError::Configuration("YOUTUBE_CHANNEL_ID is not set".to_string())
        })?;

        Ok(Credentials {
            api_key,
            channel_id,
        })
    }

    pub fn endpoint_url(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, StatsError> {
        let api_key = self.credentials()?.api_key;
        let base = self.settings.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{resource}")).map_err(|e| {
            StatsError::Configuration(format!("Invalid YouTube API base URL '{base}': {e}"))
        })?;

        url.query_pairs_mut()
            .extend_pairs(params.iter())
            .append_pair("key", api_key);

        Ok(url)
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, StatsError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_error_body(status.as_u16(), &body);
            warn!("YouTube API request failed: {err}");
            return Err(err);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[rocket::async_trait]
impl VideoPlatform for YouTubeApiClient {
    fn ensure_configured(&self) -> Result<(), StatsError> {
        self.credentials().map(|_| ())
    }

    async fn fetch_channel(&self) -> Result<ChannelListResponse, StatsError> {
        let channel_id = self.credentials()?.channel_id;
        let url = self.endpoint_url(
            "channels",
            &[("part", "statistics,snippet"), ("id", channel_id)],
        )?;
        self.get_json(url).await
    }

    async fn search_recent_videos(&self) -> Result<SearchListResponse, StatsError> {
        let channel_id = self.credentials()?.channel_id;
        let url = self.endpoint_url(
            "search",
            &[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("maxResults", SEARCH_MAX_RESULTS),
                ("order", "date"),
                ("type", "video"),
            ],
        )?;
        self.get_json(url).await
    }

    async fn fetch_content_details(
        &self,
        video_ids: &[String],
    ) -> Result<VideoDetailsListResponse, StatsError> {
        let ids = video_ids.join(",");
        let url = self.endpoint_url("videos", &[("part", "contentDetails"), ("id", ids.as_str())])?;
        self.get_json(url).await
    }

    async fn fetch_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<VideoStatisticsListResponse, StatsError> {
        let ids = video_ids.join(",");
        let url = self.endpoint_url("videos", &[("part", "statistics"), ("id", ids.as_str())])?;
        self.get_json(url).await
    }
}
