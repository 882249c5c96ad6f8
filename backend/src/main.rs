use channel_stats::config::{create_cors, init_logger, load_environment, Settings};
use channel_stats::{build_rocket, create_app_state};
use log::{info, warn};

#[rocket::launch]
fn rocket() -> _ {
    load_environment();
    init_logger();

    let settings = Settings::from_env();
    if settings.youtube.api_key.is_none() || settings.youtube.channel_id.is_none() {
        warn!("YOUTUBE_API_KEY or YOUTUBE_CHANNEL_ID missing; /channel-stats will answer 500");
    }

    let state = create_app_state(&settings).expect("Failed to initialise application state.");
    let cors = create_cors(&settings.cors_origins).expect("Failed to configure CORS.");

    info!("Allowed CORS origins: {}", settings.cors_origins.join(", "));
    build_rocket(state).attach(cors)
}
