use dinary_sync::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dinary_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let session = dinary_sync::create_session(&config);
    session.start().await;
    tracing::info!("Watching {} for notifications", config.api_base_url);

    tokio::signal::ctrl_c().await.ok();

    session.stop().await;
}
