use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers::{
    create_training, get_training, list_active_trainings, list_training_metrics, list_trainings,
    update_training_status,
};
use crate::app_state::AppState;

pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/trainings", get(list_trainings).post(create_training))
        .route("/trainings/active", get(list_active_trainings))
        .route("/trainings/{id}", get(get_training))
        .route("/trainings/{id}/status", patch(update_training_status))
        .route("/trainings/{id}/metrics", get(list_training_metrics))
}
