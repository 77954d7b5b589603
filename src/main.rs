//! solocast server entry point.

use std::net::SocketAddr;

use anyhow::Context;

use solocast::{config, serve, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let app_config = AppConfig::load().context("failed to load configuration")?;

    // Surface a misconfigured media path at startup; the API reports it
    // per-request as well, so this is advisory only.
    if let Err(reason) = config::check_media_file(&app_config.video_path).await {
        tracing::warn!(%reason, "media file check failed at startup");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let state = AppState::new(app_config);

    serve(addr, state).await.context("server terminated")?;
    Ok(())
}
