use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use trialscope::api::router::service_router;
use trialscope::api::types::ApiContext;
use trialscope::config::{self, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_config = AppConfig::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));

    tracing::info!(
        "{} v{} listening on {addr}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let ctx = ApiContext::new(app_config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, service_router(ctx)).await?;

    Ok(())
}
