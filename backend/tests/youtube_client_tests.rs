use channel_stats::config::{create_http_client, YouTubeSettings};
use channel_stats::services::fallback::FallbackProfile;
use channel_stats::services::snapshot_cache::SnapshotCache;
use channel_stats::services::stats_service::ChannelStatsService;
use channel_stats::services::youtube_client::{VideoPlatform, YouTubeApiClient};
use channel_stats::StatsError;
use httpmock::{Method::GET, MockServer};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const API_KEY: &str = "SECRET-KEY-123";
const CHANNEL_ID: &str = "UC123";

fn client_for(base_url: String, timeout_secs: u64) -> YouTubeApiClient {
    let settings = YouTubeSettings {
        api_key: Some(API_KEY.to_string()),
        channel_id: Some(CHANNEL_ID.to_string()),
        base_url,
        timeout_secs,
    };
    let http = create_http_client(&settings).unwrap();
    YouTubeApiClient::new(http, settings)
}

fn service_for(client: YouTubeApiClient) -> ChannelStatsService {
    ChannelStatsService::new(
        Arc::new(client),
        Arc::new(SnapshotCache::default()),
        FallbackProfile::default(),
    )
}

fn channel_body() -> serde_json::Value {
    json!({
        "items": [{
            "id": CHANNEL_ID,
            "snippet": {"title": "Mock Channel", "thumbnails": {"default": {"url": "c.jpg"}}},
            "statistics": {"subscriberCount": "3500", "viewCount": "1000", "videoCount": "2"}
        }]
    })
}

#[tokio::test]
async fn aggregates_live_snapshot_over_http() {
    let server = MockServer::start_async().await;
    let channel = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/youtube/v3/channels")
                .query_param("part", "statistics,snippet")
                .query_param("id", CHANNEL_ID)
                .query_param("key", API_KEY);
            then.status(200).json_body(channel_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/youtube/v3/search")
                .query_param("channelId", CHANNEL_ID)
                .query_param("maxResults", "50")
                .query_param("order", "date")
                .query_param("type", "video");
            then.status(200).json_body(json!({
                "items": [
                    {"id": {"videoId": "s1"}, "snippet": {"title": "Short", "publishedAt": "2024-06-02T00:00:00Z"}},
                    {"id": {"videoId": "l1"}, "snippet": {"title": "Long", "publishedAt": "2024-06-01T00:00:00Z"}}
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/youtube/v3/videos")
                .query_param("part", "contentDetails")
                .query_param("id", "s1,l1");
            then.status(200).json_body(json!({
                "items": [
                    {"id": "s1", "contentDetails": {"duration": "PT45S"}},
                    {"id": "l1", "contentDetails": {"duration": "PT3M5S"}}
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/youtube/v3/videos")
                .query_param("part", "statistics")
                .query_param("id", "s1,l1");
            then.status(200).json_body(json!({
                "items": [{"id": "l1", "statistics": {"viewCount": "77", "likeCount": "7"}}]
            }));
        })
        .await;

    let service = service_for(client_for(server.url("/youtube/v3"), 5));
    let snapshot = service.channel_stats().await.unwrap();

    channel.assert_async().await;
    assert!(!snapshot.degraded);
    assert_eq!(snapshot.subscriber_count, 3500);
    assert_eq!((snapshot.short_form_count, snapshot.long_form_count), (1, 1));
    assert_eq!(snapshot.recent_long_form_videos[0].view_count, 77);
    assert_eq!(snapshot.recent_short_form_videos[0].view_count, 0);
}

#[tokio::test]
async fn error_statuses_are_classified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/quota/channels");
            then.status(403).json_body(json!({
                "error": {"code": 403, "message": "quota", "errors": [{"reason": "quotaExceeded"}]}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken/channels");
            then.status(500).body("Backend Error");
        })
        .await;

    let quota = client_for(server.url("/quota"), 5).fetch_channel().await;
    assert!(matches!(quota, Err(StatsError::QuotaExceeded(_))));

    let broken = client_for(server.url("/broken"), 5).fetch_channel().await;
    assert!(matches!(
        broken,
        Err(StatsError::Upstream { status: 500, .. })
    ));
}

#[tokio::test]
async fn malformed_channel_body_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/channels");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let client = client_for(server.url("/youtube/v3"), 5);
    assert!(matches!(
        client.fetch_channel().await,
        Err(StatsError::Decode(_))
    ));

    let snapshot = service_for(client).channel_stats().await.unwrap();
    assert!(snapshot.degraded);
    assert!(!snapshot.has_videos());
}

#[tokio::test]
async fn malformed_search_body_yields_no_videos() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/channels");
            then.status(200).json_body(channel_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/search");
            then.status(200).body("{\"items\": \"nope\"");
        })
        .await;
    let videos = server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/videos");
            then.status(200).json_body(json!({"items": []}));
        })
        .await;

    let snapshot = service_for(client_for(server.url("/youtube/v3"), 5))
        .channel_stats()
        .await
        .unwrap();

    assert!(!snapshot.degraded);
    assert_eq!(snapshot.subscriber_count, 3500);
    assert!(!snapshot.has_videos());
    assert_eq!(videos.hits_async().await, 0);
}

#[tokio::test]
async fn slow_channel_lookup_times_out_into_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/channels");
            then.status(200)
                .json_body(channel_body())
                .delay(Duration::from_secs(3));
        })
        .await;

    let client = client_for(server.url("/youtube/v3"), 1);
    let err = client.fetch_channel().await.unwrap_err();
    assert!(matches!(err, StatsError::Http(ref e) if e.is_timeout()));
    assert!(!err.to_string().contains(API_KEY));

    let snapshot = service_for(client).channel_stats().await.unwrap();
    assert!(snapshot.degraded);
}

#[tokio::test]
async fn transport_errors_do_not_expose_the_api_key() {
    let client = client_for("http://127.0.0.1:1/youtube/v3".to_string(), 2);

    let err = client.fetch_channel().await.unwrap_err();

    assert!(matches!(err, StatsError::Http(_)));
    let logged = format!("Channel aggregation failed, serving fallback snapshot: {err}");
    assert!(!logged.contains(API_KEY));
    assert!(!format!("{err:?}").contains(API_KEY));
}
