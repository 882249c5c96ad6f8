use crate::models::{ChannelSnapshot, ErrorResponse, LongFormPage};
use crate::AppState;
use log::{error, info};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;

pub const LIVE_CACHE_CONTROL: &str = "public, s-maxage=1800, stale-while-revalidate=3600";
pub const DEGRADED_CACHE_CONTROL: &str = "public, s-maxage=600, stale-while-revalidate=1200";

/// JSON body plus the CDN caching hint matching the snapshot it came from.
pub struct CachedJson<T> {
    body: T,
    degraded: bool,
}

impl<T> CachedJson<T> {
    pub fn new(body: T, degraded: bool) -> Self {
        CachedJson { body, degraded }
    }

    fn cache_control(&self) -> &'static str {
        if self.degraded {
            DEGRADED_CACHE_CONTROL
        } else {
            LIVE_CACHE_CONTROL
        }
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for CachedJson<T> {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let cache_control = self.cache_control();
        Response::build_from(Json(self.body).respond_to(request)?)
            .raw_header("Cache-Control", cache_control)
            .ok()
    }
}

#[get("/")]
pub async fn channel_stats(
    state: &State<AppState>,
) -> Result<CachedJson<ChannelSnapshot>, ErrorResponse> {
    match state.stats_service.channel_stats().await {
        Ok(snapshot) => {
            let degraded = snapshot.degraded;
            Ok(CachedJson::new(snapshot, degraded))
        }
        Err(e) => {
            error!("Failed to serve channel stats: {e}");
            Err(ErrorResponse::from(e))
        }
    }
}

#[get("/long-form?<page>&<per_page>")]
pub async fn long_form_videos(
    state: &State<AppState>,
    page: Option<usize>,
    per_page: Option<usize>,
) -> Result<CachedJson<LongFormPage>, ErrorResponse> {
    match state.stats_service.long_form_page(page, per_page).await {
        Ok(response) => {
            info!(
                "Serving {} of {} long-form videos (page {})",
                response.videos.len(),
                response.total,
                response.page
            );
            let degraded = response.degraded;
            Ok(CachedJson::new(response, degraded))
        }
        Err(e) => {
            error!("Failed to serve long-form videos: {e}");
            Err(ErrorResponse::from(e))
        }
    }
}
