use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

use dm_training_backend::{
    app::create_router,
    app_state::AppState,
    config,
    db::{self, listener::spawn_change_listener},
    feed::ChangeHub,
    telemetry::{self, TelemetryConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::init()?;
    let telemetry = telemetry::init_telemetry(TelemetryConfig::from_config(config)).await?;

    let pool = db::init_pool(&config.database).await?;
    info!("Database pool ready, migrations applied");

    let hub = ChangeHub::new(config.feed.channel_capacity);
    let listener_task = spawn_change_listener(&pool, hub.clone()).await?;

    let state = AppState::new(pool, config.clone(), hub);
    let app = create_router(state);

    let addr = config.server_addr();
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    listener_task.abort();
    telemetry.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
