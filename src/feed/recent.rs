use indexmap::IndexSet;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::db::models::TrainingUpdateDetail;

/// Ids remembered after their update falls off the list.
const SEEN_WINDOW: usize = 256;

/// Newest-first list of field updates, capped and unique by id.
///
/// Live events and the initial page load can both deliver the same update,
/// in either order; whichever arrives second is ignored. Ids stay known for
/// `SEEN_WINDOW` deliveries, so a redelivery after eviction is ignored too.
#[derive(Debug, Clone)]
pub struct RecentUpdates {
    cap: usize,
    items: VecDeque<TrainingUpdateDetail>,
    seen: IndexSet<Uuid>,
    new_count: usize,
}

impl RecentUpdates {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            items: VecDeque::with_capacity(cap),
            seen: IndexSet::new(),
            new_count: 0,
        }
    }

    /// Merges rows from an initial fetch, keeping anything live events
    /// already delivered.
    pub fn load(&mut self, loaded: Vec<TrainingUpdateDetail>) {
        for update in loaded {
            if !self.items.iter().any(|existing| existing.id == update.id) {
                self.remember(update.id);
                self.items.push_back(update);
            }
        }
        self.items
            .make_contiguous()
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.items.truncate(self.cap);
    }

    /// Prepends a live update. Returns `false` when its id was already seen.
    pub fn push(&mut self, update: TrainingUpdateDetail) -> bool {
        if self.cap == 0 || self.contains(&update) {
            return false;
        }
        self.remember(update.id);
        self.items.push_front(update);
        self.items.truncate(self.cap);
        self.new_count += 1;
        true
    }

    fn contains(&self, update: &TrainingUpdateDetail) -> bool {
        self.seen.contains(&update.id) || self.items.iter().any(|existing| existing.id == update.id)
    }

    fn remember(&mut self, id: Uuid) {
        self.seen.insert(id);
        while self.seen.len() > SEEN_WINDOW.max(self.cap) {
            self.seen.shift_remove_index(0);
        }
    }

    pub fn items(&self) -> Vec<TrainingUpdateDetail> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Updates received live since the count was last cleared.
    pub fn new_count(&self) -> usize {
        self.new_count
    }

    pub fn clear_new_count(&mut self) {
        self.new_count = 0;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    pub(crate) fn update_at(minutes: i64) -> TrainingUpdateDetail {
        TrainingUpdateDetail {
            id: Uuid::new_v4(),
            training_id: Uuid::nil(),
            update_type: "Progress Update".to_string(),
            message: format!("Report at minute {}", minutes),
            images: None,
            posted_by: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH + Duration::minutes(minutes),
            training_title: Some("Cyclone shelter drill".to_string()),
            location_name: Some("Puri".to_string()),
            state: Some("Odisha".to_string()),
            poster_name: Some("Field Officer".to_string()),
        }
    }

    #[test]
    fn push_prepends_and_caps() {
        let mut recent = RecentUpdates::new(5);
        let updates: Vec<_> = (0..7).map(update_at).collect();
        for update in &updates {
            assert!(recent.push(update.clone()));
        }
        assert_eq!(recent.len(), 5);
        let ids: Vec<Uuid> = recent.items().iter().map(|u| u.id).collect();
        let expected: Vec<Uuid> = updates.iter().rev().take(5).map(|u| u.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(recent.new_count(), 7);
    }

    #[test]
    fn duplicate_push_is_ignored() {
        let mut recent = RecentUpdates::new(5);
        let update = update_at(1);
        assert!(recent.push(update.clone()));
        assert!(!recent.push(update));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.new_count(), 1);
    }

    #[test]
    fn redelivery_after_eviction_is_ignored() {
        let mut recent = RecentUpdates::new(2);
        let first = update_at(1);
        assert!(recent.push(first.clone()));
        assert!(recent.push(update_at(2)));
        assert!(recent.push(update_at(3)));
        assert!(recent.items().iter().all(|u| u.id != first.id));

        assert!(!recent.push(first.clone()));
        assert_eq!(recent.new_count(), 3);
        assert!(recent.items().iter().all(|u| u.id != first.id));
    }

    #[test]
    fn seen_window_is_bounded() {
        let mut recent = RecentUpdates::new(1);
        let first = update_at(0);
        recent.push(first.clone());
        for minute in 1..=SEEN_WINDOW as i64 {
            recent.push(update_at(minute));
        }
        assert_eq!(recent.seen.len(), SEEN_WINDOW);
        assert!(recent.push(first));
    }

    #[test]
    fn event_before_initial_load_is_not_doubled() {
        let older = update_at(1);
        let newest = update_at(10);

        let mut recent = RecentUpdates::new(5);
        assert!(recent.push(newest.clone()));
        recent.load(vec![newest.clone(), older.clone()]);

        let ids: Vec<Uuid> = recent.items().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![newest.id, older.id]);
    }

    #[test]
    fn load_respects_cap() {
        let mut recent = RecentUpdates::new(3);
        recent.load((0..6).rev().map(update_at).collect());
        assert_eq!(recent.len(), 3);
        assert_eq!(recent.items()[0].created_at, update_at(5).created_at);
        assert_eq!(recent.new_count(), 0);
    }

    #[test]
    fn clear_new_count_resets_badge() {
        let mut recent = RecentUpdates::new(5);
        recent.push(update_at(1));
        recent.push(update_at(2));
        recent.clear_new_count();
        assert_eq!(recent.new_count(), 0);
        assert_eq!(recent.len(), 2);
    }
}
