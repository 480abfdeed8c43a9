pub mod dashboard;
pub mod map;
pub mod participants;
pub mod trainings;
pub mod updates;

use axum::Router;

use crate::app_state::AppState;

/// All JSON endpoints, to be nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(trainings::training_routes())
        .nest("/map", map::map_routes())
        .merge(participants::participant_routes())
        .merge(updates::update_routes())
        .merge(dashboard::dashboard_api_routes())
}
