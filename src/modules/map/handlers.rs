use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::TrainingProgram;
use crate::db::repositories::{ProgramFilter, TrainingRepository};
use crate::error::{AppError, AppResult};
use crate::map::{BaseLayer, GeoJsonRenderer, MarkerRenderer};

#[derive(Debug, Default, Deserialize)]
pub struct MarkerQuery {
    #[serde(default)]
    pub base_layer: BaseLayer,
}

async fn located_programs(state: &AppState) -> AppResult<Vec<TrainingProgram>> {
    Ok(TrainingRepository::list_programs(&state.db, &ProgramFilter::located()).await?)
}

pub async fn list_markers(
    State(state): State<AppState>,
    Query(query): Query<MarkerQuery>,
) -> AppResult<Json<Value>> {
    let programs = located_programs(&state).await?;
    let mut renderer = GeoJsonRenderer::new();
    renderer.set_base_layer(query.base_layer);
    Ok(Json(renderer.render_markers(&programs)))
}

/// Marker click: the full record of the selected program.
pub async fn select_marker(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> AppResult<Json<TrainingProgram>> {
    let programs = located_programs(&state).await?;
    let mut renderer = GeoJsonRenderer::new();
    renderer.on_select(Box::new(|program| {
        info!(program_id = %program.id, title = %program.title, "Map marker selected");
    }));
    renderer.render_markers(&programs);

    renderer
        .select(program_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No map marker for program {}", program_id)))
}
