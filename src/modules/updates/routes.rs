use axum::{routing::get, Router};

use super::handlers::{list_program_updates, list_recent_updates, post_update};
use crate::app_state::AppState;

pub fn update_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/trainings/{id}/updates",
            get(list_program_updates).post(post_update),
        )
        .route("/updates/recent", get(list_recent_updates))
}
