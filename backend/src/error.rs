use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("YouTube API returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("YouTube API quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("Channel not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Failed to decode YouTube response: {0}")]
    Decode(String),
}

impl StatsError {
    /// Configuration errors bypass the fallback snapshot.
    pub fn is_configuration(&self) -> bool {
        matches!(self, StatsError::Configuration(_))
    }
}

/// Request URLs carry the API key, so they never make it into the error.
impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::Http(err.without_url())
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Decode(err.to_string())
    }
}
