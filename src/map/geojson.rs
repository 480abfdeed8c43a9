use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{
    markers_from_programs, BaseLayer, MarkerRenderer, SelectCallback, DEFAULT_CENTER, DEFAULT_ZOOM,
};
use crate::analytics::count_by_status;
use crate::db::models::{TrainingProgram, TrainingStatus};

/// Renders markers as a GeoJSON `FeatureCollection` for the browser map.
#[derive(Default)]
pub struct GeoJsonRenderer {
    base_layer: BaseLayer,
    programs: Vec<TrainingProgram>,
    on_select: Option<SelectCallback>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }
}

impl MarkerRenderer for GeoJsonRenderer {
    type Output = Value;

    fn render_markers(&mut self, programs: &[TrainingProgram]) -> Value {
        self.programs = programs
            .iter()
            .filter(|p| p.coordinates().is_some())
            .cloned()
            .collect();

        let features: Vec<Value> = markers_from_programs(&self.programs)
            .into_iter()
            .map(|marker| {
                json!({
                    "type": "Feature",
                    "id": marker.id,
                    "geometry": {
                        "type": "Point",
                        "coordinates": [marker.longitude, marker.latitude],
                    },
                    "properties": marker,
                })
            })
            .collect();

        let counts = count_by_status(&self.programs);
        let mut legend = Map::new();
        legend.insert("total".to_string(), json!(self.programs.len()));
        for status in TrainingStatus::all() {
            let count = counts.get(status).copied().unwrap_or(0);
            legend.insert(status.as_str().to_string(), json!(count));
        }

        json!({
            "type": "FeatureCollection",
            "features": features,
            "base_layer": self.base_layer,
            "view": {
                "center": [DEFAULT_CENTER.1, DEFAULT_CENTER.0],
                "zoom": DEFAULT_ZOOM,
            },
            "legend": legend,
        })
    }

    fn on_select(&mut self, callback: SelectCallback) {
        self.on_select = Some(callback);
    }

    fn set_base_layer(&mut self, layer: BaseLayer) {
        self.base_layer = layer;
    }

    fn select(&self, id: Uuid) -> Option<TrainingProgram> {
        let program = self.programs.iter().find(|p| p.id == id)?;
        if let Some(callback) = &self.on_select {
            callback(program);
        }
        Some(program.clone())
    }
}
