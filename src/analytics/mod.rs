//! Aggregations over an already-fetched list of training programs.
//!
//! Everything here is a pure function of its input: no I/O, no shared state,
//! safe to call from any number of handlers at once. Grouping results are
//! `IndexMap`s that keep the order in which each key was first seen; callers
//! that want a ranking go through [`top_n_by_count`], callers that want a
//! timeline go through [`chronological`].

mod display;
mod summary;

use indexmap::IndexMap;
use serde::Serialize;
use std::hash::Hash;
use time::{Month, OffsetDateTime};

use crate::db::models::{DisasterType, TrainingProgram, TrainingStatus, TrainingType};

pub use display::{format_crore, format_percent, round_one_decimal, CRORE};
pub use summary::{AnalyticsSummary, DashboardStats, MonthBucket, StateShare};

/// Counts records per key, keys in first-occurrence order.
pub fn group_count<T, K, F>(records: &[T], key_selector: F) -> IndexMap<K, usize>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut counts = IndexMap::new();
    for record in records {
        *counts.entry(key_selector(record)).or_insert(0) += 1;
    }
    counts
}

/// Like [`group_count`], but a record adds one to every key it yields. A
/// record yielding no keys is not counted anywhere.
pub fn group_count_multi<T, K, I, F>(records: &[T], multi_key_selector: F) -> IndexMap<K, usize>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
    F: Fn(&T) -> I,
{
    let mut counts = IndexMap::new();
    for record in records {
        for key in multi_key_selector(record) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

pub fn count_by_status(records: &[TrainingProgram]) -> IndexMap<TrainingStatus, usize> {
    group_count(records, |p| p.status)
}

pub fn count_by_type(records: &[TrainingProgram]) -> IndexMap<TrainingType, usize> {
    group_count(records, |p| p.training_type)
}

pub fn count_by_disaster_type(records: &[TrainingProgram]) -> IndexMap<DisasterType, usize> {
    group_count_multi(records, |p| p.disaster_types.clone())
}

pub fn count_by_state(records: &[TrainingProgram]) -> IndexMap<String, usize> {
    group_count(records, |p| p.state.clone())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantTotals {
    pub actual_total: i64,
    pub target_total: i64,
}

impl ParticipantTotals {
    /// Actual over target as a percentage with one decimal. Zero when no
    /// target has been set, never NaN.
    pub fn participation_rate(&self) -> f64 {
        if self.target_total == 0 {
            return 0.0;
        }
        round_one_decimal(self.actual_total as f64 / self.target_total as f64 * 100.0)
    }
}

pub fn sum_participants(records: &[TrainingProgram]) -> ParticipantTotals {
    records.iter().fold(ParticipantTotals::default(), |mut totals, p| {
        totals.actual_total += i64::from(p.actual_participants.max(0));
        totals.target_total += i64::from(p.target_participants.max(0));
        totals
    })
}

/// Number of distinct `state` values, compared byte for byte.
pub fn states_covered(records: &[TrainingProgram]) -> usize {
    records
        .iter()
        .map(|p| p.state.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len()
}

pub fn budget_total(records: &[TrainingProgram]) -> f64 {
    // f64 `sum` starts from -0.0, which would print as "-0.0".
    records
        .iter()
        .fold(0.0, |total, p| total + p.budget.unwrap_or(0.0))
}

/// Share of programs with status `completed`, as a whole-number percentage.
pub fn completion_rate(records: &[TrainingProgram]) -> u32 {
    if records.is_empty() {
        return 0;
    }
    let completed = records
        .iter()
        .filter(|p| p.status == TrainingStatus::Completed)
        .count();
    (completed as f64 / records.len() as f64 * 100.0).round() as u32
}

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `"Mar 2025"` style bucket label.
pub fn month_label(date: OffsetDateTime) -> String {
    let index = u8::from(date.month()) as usize - 1;
    format!("{} {}", MONTH_ABBREVIATIONS[index], date.year())
}

/// Parses a [`month_label`] back into `(year, month)`.
pub fn parse_month_label(label: &str) -> Option<(i32, Month)> {
    let (month, year) = label.trim().split_once(' ')?;
    let position = MONTH_ABBREVIATIONS.iter().position(|m| *m == month)?;
    let month = Month::try_from(position as u8 + 1).ok()?;
    let year = year.trim().parse().ok()?;
    Some((year, month))
}

/// Programs per start month. Months without programs get no bucket.
pub fn monthly_trend(records: &[TrainingProgram]) -> IndexMap<String, usize> {
    group_count(records, |p| month_label(p.start_date))
}

/// Trend buckets ordered by calendar month. Labels that do not parse keep
/// their relative order after the dated ones.
pub fn chronological(trend: &IndexMap<String, usize>) -> Vec<(String, usize)> {
    let mut buckets: Vec<(Option<(i32, u8)>, String, usize)> = trend
        .iter()
        .map(|(label, count)| {
            let key = parse_month_label(label).map(|(year, month)| (year, u8::from(month)));
            (key, label.clone(), *count)
        })
        .collect();
    buckets.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    buckets
        .into_iter()
        .map(|(_, label, count)| (label, count))
        .collect()
}

/// The `n` largest buckets, highest count first. Equal counts keep the
/// order they have in `mapping`.
pub fn top_n_by_count<K: Clone>(mapping: &IndexMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = mapping
        .iter()
        .map(|(key, count)| (key.clone(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;
    use uuid::Uuid;

    pub(crate) fn program(status: TrainingStatus, actual: i32, target: i32) -> TrainingProgram {
        TrainingProgram {
            id: Uuid::new_v4(),
            title: "Flood rescue drill".to_string(),
            description: None,
            training_type: TrainingType::Drill,
            disaster_types: vec![DisasterType::Flood],
            status,
            start_date: datetime!(2025-03-10 09:00 UTC),
            end_date: datetime!(2025-03-11 17:00 UTC),
            location_name: "Patna".to_string(),
            latitude: None,
            longitude: None,
            state: "Bihar".to_string(),
            district: "Patna".to_string(),
            organizing_body: "SDMA Bihar".to_string(),
            coordinator_id: None,
            target_participants: target,
            actual_participants: actual,
            budget: None,
            created_by: None,
            created_at: datetime!(2025-01-01 00:00 UTC),
            updated_at: datetime!(2025-01-01 00:00 UTC),
        }
    }

    fn with_disasters(types: &[DisasterType]) -> TrainingProgram {
        let mut p = program(TrainingStatus::Planned, 0, 0);
        p.disaster_types = types.to_vec();
        p
    }

    fn starting(date: OffsetDateTime) -> TrainingProgram {
        let mut p = program(TrainingStatus::Planned, 0, 0);
        p.start_date = date;
        p
    }

    #[test]
    fn status_and_participants_scenario() {
        let records = vec![
            program(TrainingStatus::Ongoing, 10, 20),
            program(TrainingStatus::Completed, 30, 30),
        ];

        let by_status = count_by_status(&records);
        assert_eq!(by_status.len(), 2);
        assert_eq!(by_status[&TrainingStatus::Ongoing], 1);
        assert_eq!(by_status[&TrainingStatus::Completed], 1);
        assert!(!by_status.contains_key(&TrainingStatus::Planned));

        let totals = sum_participants(&records);
        assert_eq!(totals, ParticipantTotals { actual_total: 40, target_total: 50 });
        assert_eq!(format_percent(totals.participation_rate()), "80.0");
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        let records: Vec<TrainingProgram> = Vec::new();
        assert!(count_by_status(&records).is_empty());
        assert!(count_by_disaster_type(&records).is_empty());
        assert!(monthly_trend(&records).is_empty());
        assert_eq!(sum_participants(&records), ParticipantTotals::default());
        assert_eq!(sum_participants(&records).participation_rate(), 0.0);
        assert_eq!(states_covered(&records), 0);
        assert_eq!(budget_total(&records), 0.0);
        assert!(budget_total(&records).is_sign_positive());
        assert_eq!(format_crore(budget_total(&records)), "0.0");
        assert_eq!(completion_rate(&records), 0);
        assert!(top_n_by_count(&count_by_state(&records), 10).is_empty());
    }

    #[test]
    fn zero_target_rate_is_zero_not_nan() {
        let records = vec![program(TrainingStatus::Ongoing, 12, 0)];
        let rate = sum_participants(&records).participation_rate();
        assert_eq!(rate, 0.0);
        assert!(!rate.is_nan());
    }

    #[rstest]
    #[case(1, 3, 33.3)]
    #[case(2, 3, 66.7)]
    #[case(150, 100, 150.0)]
    #[case(0, 45, 0.0)]
    fn participation_rate_rounds_to_one_decimal(
        #[case] actual: i32,
        #[case] target: i32,
        #[case] expected: f64,
    ) {
        let totals = sum_participants(&[program(TrainingStatus::Ongoing, actual, target)]);
        assert_eq!(totals.participation_rate(), expected);
    }

    #[test]
    fn disaster_types_count_once_per_program_and_type() {
        let records = vec![
            with_disasters(&[DisasterType::Flood, DisasterType::Cyclone]),
            with_disasters(&[DisasterType::Flood]),
        ];
        let counts = count_by_disaster_type(&records);
        let expected: Vec<(DisasterType, usize)> =
            vec![(DisasterType::Flood, 2), (DisasterType::Cyclone, 1)];
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn multi_count_total_matches_key_total() {
        let records = vec![
            with_disasters(&[DisasterType::Fire, DisasterType::Industrial, DisasterType::Other]),
            with_disasters(&[]),
            with_disasters(&[DisasterType::Fire]),
        ];
        let counts = count_by_disaster_type(&records);
        let expected: usize = records.iter().map(|p| p.disaster_types.len()).sum();
        assert_eq!(counts.values().sum::<usize>(), expected);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn status_counts_sum_to_input_length() {
        let records = vec![
            program(TrainingStatus::Planned, 0, 10),
            program(TrainingStatus::Planned, 0, 10),
            program(TrainingStatus::Cancelled, 0, 10),
            program(TrainingStatus::Ongoing, 5, 10),
        ];
        let counts = count_by_status(&records);
        assert_eq!(counts.values().sum::<usize>(), records.len());
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![
            TrainingStatus::Planned,
            TrainingStatus::Cancelled,
            TrainingStatus::Ongoing,
        ]);
    }

    #[test]
    fn group_count_keeps_first_occurrence_order() {
        let states = ["Odisha", "Kerala", "Odisha", "Assam", "Kerala", "Odisha"];
        let counts = group_count(&states[..], |s| s.to_string());
        let keys: Vec<&str> = counts.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Odisha", "Kerala", "Assam"]);
        assert_eq!(counts["Odisha"], 3);
    }

    #[test]
    fn states_are_compared_exactly() {
        let mut a = program(TrainingStatus::Planned, 0, 0);
        a.state = "Tamil Nadu".to_string();
        let mut b = a.clone();
        b.state = "tamil nadu".to_string();
        let c = a.clone();
        assert_eq!(states_covered(&[a, b, c]), 2);
    }

    #[test]
    fn budget_total_skips_missing_budgets() {
        let mut a = program(TrainingStatus::Planned, 0, 0);
        a.budget = Some(2_500_000.0);
        let b = program(TrainingStatus::Planned, 0, 0);
        let mut c = program(TrainingStatus::Planned, 0, 0);
        c.budget = Some(500_000.0);
        assert_eq!(budget_total(&[a, b, c]), 3_000_000.0);
    }

    #[test]
    fn monthly_trend_labels_and_insertion_order() {
        let records = vec![
            starting(datetime!(2025-03-02 10:00 UTC)),
            starting(datetime!(2024-12-15 10:00 UTC)),
            starting(datetime!(2025-03-28 10:00 UTC)),
        ];
        let trend = monthly_trend(&records);
        let entries: Vec<(String, usize)> = trend.clone().into_iter().collect();
        assert_eq!(entries, vec![("Mar 2025".to_string(), 2), ("Dec 2024".to_string(), 1)]);

        let ordered = chronological(&trend);
        assert_eq!(ordered, vec![("Dec 2024".to_string(), 1), ("Mar 2025".to_string(), 2)]);
    }

    #[test]
    fn chronological_does_not_use_string_order() {
        let mut trend = IndexMap::new();
        trend.insert("Feb 2025".to_string(), 1);
        trend.insert("Aug 2024".to_string(), 4);
        trend.insert("Jan 2025".to_string(), 2);
        let labels: Vec<String> = chronological(&trend).into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Aug 2024", "Jan 2025", "Feb 2025"]);
    }

    #[test]
    fn month_label_round_trips() {
        let label = month_label(datetime!(2025-09-30 23:00 UTC));
        assert_eq!(label, "Sep 2025");
        assert_eq!(parse_month_label(&label), Some((2025, Month::September)));
        assert_eq!(parse_month_label("Sept 2025"), None);
    }

    #[test]
    fn top_n_sorts_descending_with_stable_ties() {
        let mut counts = IndexMap::new();
        counts.insert("Assam", 2);
        counts.insert("Odisha", 5);
        counts.insert("Kerala", 2);
        counts.insert("Gujarat", 1);

        let top = top_n_by_count(&counts, 3);
        assert_eq!(top, vec![("Odisha", 5), ("Assam", 2), ("Kerala", 2)]);
        assert_eq!(top_n_by_count(&counts, 0), vec![]);
        assert_eq!(top_n_by_count(&counts, 10).len(), 4);
    }

    #[test]
    fn completion_rate_is_whole_percent() {
        let records = vec![
            program(TrainingStatus::Completed, 0, 0),
            program(TrainingStatus::Ongoing, 0, 0),
            program(TrainingStatus::Planned, 0, 0),
        ];
        assert_eq!(completion_rate(&records), 33);
    }

    #[test]
    fn aggregations_are_idempotent() {
        let records = vec![
            program(TrainingStatus::Ongoing, 10, 20),
            with_disasters(&[DisasterType::Drought, DisasterType::Flood]),
            starting(datetime!(2023-07-01 00:00 UTC)),
        ];
        assert_eq!(count_by_status(&records), count_by_status(&records));
        assert_eq!(count_by_disaster_type(&records), count_by_disaster_type(&records));
        assert_eq!(monthly_trend(&records), monthly_trend(&records));
        assert_eq!(sum_participants(&records), sum_participants(&records));
        assert_eq!(
            top_n_by_count(&count_by_state(&records), 2),
            top_n_by_count(&count_by_state(&records), 2)
        );
    }
}
