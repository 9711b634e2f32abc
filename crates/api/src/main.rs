use anyhow::Context;

use bazaar_api::{app, config::GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bazaar_observability::init();

    let config = GatewayConfig::from_env()?;
    let state = app::services::build_state(&config)?;
    let router = app::build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
