use indexmap::IndexMap;
use serde::Serialize;

use super::{
    budget_total, chronological, completion_rate, count_by_disaster_type, count_by_state,
    count_by_status, count_by_type, format_crore, format_percent, monthly_trend,
    states_covered, sum_participants, top_n_by_count, ParticipantTotals,
};
use crate::db::models::{DisasterType, TrainingProgram, TrainingStatus, TrainingType};

const TOP_STATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub month: String,
    pub programs: usize,
}

/// A state's program count, with its bar length relative to the busiest state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateShare {
    pub state: String,
    pub programs: usize,
    pub share: f64,
}

/// Everything the analytics view shows, computed from one program list.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_programs: usize,
    pub by_status: IndexMap<TrainingStatus, usize>,
    pub completion_rate: u32,
    pub participants: ParticipantTotals,
    pub participation_rate: f64,
    pub participation_rate_display: String,
    pub states_covered: usize,
    pub budget_total: f64,
    pub budget_crore: String,
    pub by_type: IndexMap<TrainingType, usize>,
    pub by_disaster_type: IndexMap<DisasterType, usize>,
    pub by_state: IndexMap<String, usize>,
    pub monthly_trend: Vec<MonthBucket>,
    pub top_states: Vec<StateShare>,
}

impl AnalyticsSummary {
    pub fn from_programs(programs: &[TrainingProgram]) -> Self {
        let participants = sum_participants(programs);
        let participation_rate = participants.participation_rate();
        let budget = budget_total(programs);
        let by_state = count_by_state(programs);

        let top = top_n_by_count(&by_state, TOP_STATES);
        let busiest = top.first().map(|(_, count)| *count).unwrap_or(0);
        let top_states = top
            .into_iter()
            .map(|(state, programs)| StateShare {
                share: if busiest == 0 {
                    0.0
                } else {
                    programs as f64 / busiest as f64 * 100.0
                },
                state,
                programs,
            })
            .collect();

        let monthly_trend = chronological(&monthly_trend(programs))
            .into_iter()
            .map(|(month, programs)| MonthBucket { month, programs })
            .collect();

        Self {
            total_programs: programs.len(),
            by_status: count_by_status(programs),
            completion_rate: completion_rate(programs),
            participants,
            participation_rate,
            participation_rate_display: format_percent(participation_rate),
            states_covered: states_covered(programs),
            budget_total: budget,
            budget_crore: format_crore(budget),
            by_type: count_by_type(programs),
            by_disaster_type: count_by_disaster_type(programs),
            by_state,
            monthly_trend,
            top_states,
        }
    }

    /// Count for one status; statuses with no programs are absent from
    /// `by_status` and read as zero.
    pub fn status_count(&self, status: TrainingStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Headline numbers on the dashboard landing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_programs: usize,
    pub ongoing_programs: usize,
    pub total_participants: i64,
    pub states_covered: usize,
}

impl DashboardStats {
    pub fn from_programs(programs: &[TrainingProgram]) -> Self {
        Self {
            total_programs: programs.len(),
            ongoing_programs: count_by_status(programs)
                .get(&TrainingStatus::Ongoing)
                .copied()
                .unwrap_or(0),
            total_participants: sum_participants(programs).actual_total,
            states_covered: states_covered(programs),
        }
    }
}
