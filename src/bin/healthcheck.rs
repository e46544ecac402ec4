//! Connectivity smoke test: one request against the running service.
//!
//! Exit codes: 0 reachable, 1 HTTP error status, 2 connection failure,
//! 3 other request error, 4 bad configuration.

use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use giftdesk::core::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::from(4);
        }
    };

    let url = format!("http://{}/requests/", config.server_address());
    tracing::info!("Attempting to connect to {}", url);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return ExitCode::from(3);
        }
    };

    match client.get(&url).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                tracing::info!("Success! Backend is reachable, status {}", status);
                ExitCode::SUCCESS
            } else {
                tracing::error!("Backend returned an error code: {}", status);
                ExitCode::from(1)
            }
        }
        Err(e) if e.is_connect() => {
            tracing::error!("Failed to connect: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("Request error: {}", e);
            ExitCode::from(3)
        }
    }
}
