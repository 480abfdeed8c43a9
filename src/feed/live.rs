use serde::{Deserialize, Serialize};

use super::RecentUpdates;
use crate::db::models::{TrainingProgram, TrainingUpdateDetail};

/// Messages pushed to a dashboard socket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    Snapshot {
        recent_updates: Vec<TrainingUpdateDetail>,
        active_trainings: Vec<TrainingProgram>,
        new_count: usize,
    },
    Update {
        update: TrainingUpdateDetail,
        recent_updates: Vec<TrainingUpdateDetail>,
        new_count: usize,
    },
    ActiveTrainings {
        active_trainings: Vec<TrainingProgram>,
    },
    NewCount {
        new_count: usize,
    },
}

/// Messages a dashboard socket may send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ClearNewCount,
}

/// Per-connection state of the dashboard's live widgets: the recent field
/// updates and the list of ongoing programs.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    recent: RecentUpdates,
    active: Vec<TrainingProgram>,
}

impl LiveFeed {
    pub fn new(recent_cap: usize) -> Self {
        Self {
            recent: RecentUpdates::new(recent_cap),
            active: Vec::new(),
        }
    }

    pub fn load(&mut self, recent: Vec<TrainingUpdateDetail>, active: Vec<TrainingProgram>) {
        self.recent.load(recent);
        self.active = active;
    }

    pub fn snapshot(&self) -> FeedMessage {
        FeedMessage::Snapshot {
            recent_updates: self.recent.items(),
            active_trainings: self.active.clone(),
            new_count: self.recent.new_count(),
        }
    }

    /// `None` when the update is already on the list.
    pub fn apply_update(&mut self, update: TrainingUpdateDetail) -> Option<FeedMessage> {
        if !self.recent.push(update.clone()) {
            return None;
        }
        Some(FeedMessage::Update {
            update,
            recent_updates: self.recent.items(),
            new_count: self.recent.new_count(),
        })
    }

    pub fn replace_active(&mut self, active: Vec<TrainingProgram>) -> FeedMessage {
        self.active = active;
        FeedMessage::ActiveTrainings {
            active_trainings: self.active.clone(),
        }
    }

    pub fn handle_client(&mut self, message: ClientMessage) -> FeedMessage {
        match message {
            ClientMessage::ClearNewCount => {
                self.recent.clear_new_count();
                FeedMessage::NewCount { new_count: 0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::program;
    use crate::db::models::TrainingStatus;
    use crate::feed::recent::tests::update_at;

    #[test]
    fn snapshot_reflects_loaded_state() {
        let mut feed = LiveFeed::new(5);
        feed.load(vec![update_at(2), update_at(1)], vec![program(TrainingStatus::Ongoing, 3, 10)]);
        let json = serde_json::to_value(feed.snapshot()).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["recent_updates"].as_array().unwrap().len(), 2);
        assert_eq!(json["active_trainings"][0]["status"], "ongoing");
        assert_eq!(json["new_count"], 0);
    }

    #[test]
    fn repeated_update_produces_no_message() {
        let mut feed = LiveFeed::new(5);
        let update = update_at(7);
        assert!(feed.apply_update(update.clone()).is_some());
        assert!(feed.apply_update(update).is_none());
    }

    #[test]
    fn clear_new_count_message() {
        let mut feed = LiveFeed::new(5);
        feed.apply_update(update_at(1));
        let message: ClientMessage = serde_json::from_str(r#"{"type":"clear_new_count"}"#).unwrap();
        let reply = serde_json::to_value(feed.handle_client(message)).unwrap();
        assert_eq!(reply, serde_json::json!({"type": "new_count", "new_count": 0}));
    }

    #[test]
    fn replacing_active_list_is_announced() {
        let mut feed = LiveFeed::new(5);
        let message = feed.replace_active(vec![
            program(TrainingStatus::Ongoing, 1, 2),
            program(TrainingStatus::Ongoing, 3, 4),
        ]);
        match message {
            FeedMessage::ActiveTrainings { active_trainings } => assert_eq!(active_trainings.len(), 2),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
