use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use farmacia_web::{app, cli::Cli, config, AppState};

/// How often idle sessions are swept
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up FARMACIA_BACKEND_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("farmacia_web=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(config::config().clone());
    tracing::info!(
        "Starting Farmácia web in {:?} mode, backend at {}",
        config.environment,
        config.backend.base_url
    );

    if farmacia_web::is_production!(config) && !config.session.secure_cookie {
        tracing::warn!("Session cookie is not marked Secure in production");
    }

    let port = config.server.port;
    let state = AppState::new(config)?;

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            sessions.purge_idle(chrono::Utc::now()).await;
        }
    });

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Farmácia web listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
