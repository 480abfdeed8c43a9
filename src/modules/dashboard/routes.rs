use axum::{routing::get, Router};

use super::handlers::{analytics, dashboard, dashboard_page};
use crate::app_state::AppState;

/// JSON views, mounted under `/api`.
pub fn dashboard_api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/analytics", get(analytics))
}

pub fn dashboard_page_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_page))
}
