//! In-process change notifications.
//!
//! The database listener publishes every row change into a [`ChangeHub`].
//! Each consumer owns a [`Subscription`] for as long as it needs events and
//! releases it by dropping it; there is no global subscription registry.

mod live;
mod recent;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::db::models::TrainingStatus;

pub use live::{ClientMessage, FeedMessage, LiveFeed};
pub use recent::RecentUpdates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    TrainingPrograms,
    TrainingUpdates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOperation {
    Insert,
    Update,
}

/// One row change as published by the `notify_table_change` trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub operation: ChangeOperation,
    pub id: Uuid,
    #[serde(default)]
    pub status: Option<TrainingStatus>,
}

impl ChangeEvent {
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Which events a subscription wants. `None` fields match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub table: ChangeTable,
    pub operation: Option<ChangeOperation>,
    pub status: Option<TrainingStatus>,
}

impl SubscriptionFilter {
    pub fn table(table: ChangeTable) -> Self {
        Self {
            table,
            operation: None,
            status: None,
        }
    }

    pub fn inserts(table: ChangeTable) -> Self {
        Self {
            operation: Some(ChangeOperation::Insert),
            ..Self::table(table)
        }
    }

    pub fn with_status(mut self, status: TrainingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.table == self.table
            && self.operation.map_or(true, |op| op == event.operation)
            && self.status.map_or(true, |status| event.status == Some(status))
    }
}

#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns how many live subscriptions received the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, filter: SubscriptionFilter) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            filter,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live interest in one table's changes. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
    filter: SubscriptionFilter,
}

impl Subscription {
    pub fn filter(&self) -> &SubscriptionFilter {
        &self.filter
    }

    /// Waits for the next matching event. `None` once the hub is gone.
    /// Events dropped because this subscriber fell behind are skipped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, table = ?self.filter.table, "Subscription lagged behind change feed");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
