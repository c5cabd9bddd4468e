use captions_broker::{app_state::AppState, config::AppConfig};
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting caption status refresher");

    let config = AppConfig::from_env().expect("Failed to load configuration");
    // The refresher only sees jobs the server wrote to the shared database.
    let state = match AppState::from_config_shared(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Refresher cannot start");
            std::process::exit(1);
        }
    };

    if state.client.providers().is_empty() {
        tracing::warn!("No caption providers configured, nothing will be refreshed");
    }

    let interval = Duration::from_secs(config.refresh_interval_secs.max(1));
    tracing::info!(
        interval_secs = interval.as_secs(),
        batch_size = config.refresh_batch_size,
        "Refresher ready, starting refresh loop"
    );

    loop {
        match state
            .client
            .refresh_pending_jobs(config.refresh_batch_size)
            .await
        {
            Ok(0) => tracing::trace!("No jobs completed this pass"),
            Ok(completed) => tracing::info!(completed, "Refresh pass completed jobs"),
            Err(e) => tracing::error!(error = %e, "Refresh pass failed, will retry"),
        }

        sleep(interval).await;
    }
}
