pub mod aggregator;
pub mod classifier;
pub mod fallback;
pub mod snapshot_cache;
pub mod stats_service;
pub mod youtube_client;
