use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Videos at or below this length count as short-form.
pub const SHORT_FORM_MAX_SECONDS: u64 = 60;
pub const RECENT_LONG_FORM_LIMIT: usize = 9;
pub const RECENT_SHORT_FORM_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Short,
    Long,
}

impl VideoFormat {
    pub fn classify(duration_seconds: u64) -> Self {
        if duration_seconds <= SHORT_FORM_MAX_SECONDS {
            VideoFormat::Short
        } else {
            VideoFormat::Long
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub duration_display: String,
    pub view_count: u64,
    pub like_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnapshot {
    pub channel_title: String,
    pub channel_thumbnail_url: String,
    pub subscriber_count: u64,
    pub total_view_count: u64,
    pub total_video_count: u64,
    pub short_form_count: u64,
    pub long_form_count: u64,
    pub recent_long_form_videos: Vec<VideoSummary>,
    pub recent_short_form_videos: Vec<VideoSummary>,
    pub all_long_form_videos: Vec<VideoSummary>,
    pub computed_at: DateTime<Utc>,
    pub degraded: bool,
}

impl ChannelSnapshot {
    pub fn has_videos(&self) -> bool {
        !(self.recent_long_form_videos.is_empty()
            && self.recent_short_form_videos.is_empty()
            && self.all_long_form_videos.is_empty())
    }
}

/// One page of the uncapped long-form list, for "load more" on the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongFormPage {
    pub videos: Vec<VideoSummary>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub has_more: bool,
    pub degraded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl From<StatsError> for ErrorResponse {
    fn from(err: StatsError) -> Self {
        let error = match err {
            StatsError::Configuration(_) => "Channel statistics are not configured",
            _ => "Failed to load channel statistics",
        };
        ErrorResponse {
            error: error.to_string(),
            details: err.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(Json(self).respond_to(request)?)
            .status(Status::InternalServerError)
            .ok()
    }
}
