use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_participants, register_participant, toggle_attendance};
use crate::app_state::AppState;

pub fn participant_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/trainings/{id}/participants",
            get(list_participants).post(register_participant),
        )
        .route("/participants/{id}/attendance", post(toggle_attendance))
}
