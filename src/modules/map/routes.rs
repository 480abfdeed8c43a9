use axum::{routing::get, Router};

use super::handlers::{list_markers, select_marker};
use crate::app_state::AppState;

pub fn map_routes() -> Router<AppState> {
    Router::new()
        .route("/markers", get(list_markers))
        .route("/markers/{id}", get(select_marker))
}
