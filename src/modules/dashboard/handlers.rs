use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

use crate::analytics::{AnalyticsSummary, DashboardStats, StateShare};
use crate::app_state::AppState;
use crate::auth::CurrentProfile;
use crate::db::models::{Profile, TrainingProgram, TrainingStatus};
use crate::db::repositories::{ProgramFilter, TrainingRepository};
use crate::error::AppResult;

/// Programs listed under "Recent Training Programs".
const RECENT_PROGRAMS: usize = 10;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: Option<Profile>,
    pub stats: DashboardStats,
    pub recent_programs: Vec<TrainingProgram>,
    pub can_create: bool,
}

async fn all_programs(state: &AppState) -> AppResult<Vec<TrainingProgram>> {
    Ok(TrainingRepository::list_programs(&state.db, &ProgramFilter::default()).await?)
}

pub async fn dashboard(
    State(state): State<AppState>,
    profile: Option<CurrentProfile>,
) -> AppResult<Json<DashboardResponse>> {
    let programs = all_programs(&state).await?;
    let profile = profile.map(|CurrentProfile(p)| p);

    Ok(Json(DashboardResponse {
        stats: DashboardStats::from_programs(&programs),
        recent_programs: programs.into_iter().take(RECENT_PROGRAMS).collect(),
        can_create: profile
            .as_ref()
            .is_some_and(|p| p.role.can_create_training()),
        profile,
    }))
}

pub async fn analytics(State(state): State<AppState>) -> AppResult<Json<AnalyticsSummary>> {
    let programs = all_programs(&state).await?;
    Ok(Json(AnalyticsSummary::from_programs(&programs)))
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    app_name: String,
    stats: DashboardStats,
    completion_rate: u32,
    participation_rate: String,
    budget_crore: String,
    ongoing: usize,
    planned: usize,
    top_states: Vec<StateShare>,
    recent_programs: Vec<TrainingProgram>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!("Failed to render template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Server-rendered summary page.
pub async fn dashboard_page(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let programs = all_programs(&state).await?;
    let summary = AnalyticsSummary::from_programs(&programs);

    Ok(HtmlTemplate(DashboardTemplate {
        app_name: state.env.app.name.clone(),
        stats: DashboardStats::from_programs(&programs),
        completion_rate: summary.completion_rate,
        participation_rate: summary.participation_rate_display.clone(),
        budget_crore: summary.budget_crore.clone(),
        ongoing: summary.status_count(TrainingStatus::Ongoing),
        planned: summary.status_count(TrainingStatus::Planned),
        top_states: summary.top_states,
        recent_programs: programs.into_iter().take(RECENT_PROGRAMS).collect(),
    }))
}
