use anyhow::{Context, Result};
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::feed::{ChangeEvent, ChangeHub};

/// Channel the `notify_table_change` trigger publishes on.
pub const CHANGE_CHANNEL: &str = "table_changes";

/// Forwards database change notifications into the hub until the process
/// exits. Malformed payloads are logged and skipped.
pub async fn spawn_change_listener(pool: &PgPool, hub: ChangeHub) -> Result<JoinHandle<()>> {
    let mut listener = PgListener::connect_with(pool)
        .await
        .context("Failed to open change listener connection")?;
    listener
        .listen(CHANGE_CHANNEL)
        .await
        .with_context(|| format!("Failed to LISTEN on {}", CHANGE_CHANNEL))?;

    info!("Listening for table changes on channel {}", CHANGE_CHANNEL);

    Ok(tokio::spawn(async move {
        loop {
            match listener.recv().await {
                Ok(notification) => match ChangeEvent::from_payload(notification.payload()) {
                    Ok(event) => {
                        let delivered = hub.publish(event.clone());
                        debug!(?event, delivered, "Change event published");
                    }
                    Err(e) => warn!("Ignoring malformed change payload: {}", e),
                },
                Err(e) => {
                    // PgListener reconnects on the next recv.
                    error!("Change listener error: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }))
}
