//! Program locations as map markers.
//!
//! The map provider is hidden behind [`MarkerRenderer`]; the service ships a
//! GeoJSON implementation that the browser map consumes.

mod geojson;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{TrainingProgram, TrainingStatus};

pub use geojson::GeoJsonRenderer;

/// Latitude/longitude the map opens on (centre of India).
pub const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);
pub const DEFAULT_ZOOM: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseLayer {
    #[default]
    Satellite,
    Street,
}

impl Display for BaseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseLayer::Satellite => f.write_str("satellite"),
            BaseLayer::Street => f.write_str("street"),
        }
    }
}

impl FromStr for BaseLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "satellite" => Ok(BaseLayer::Satellite),
            "street" => Ok(BaseLayer::Street),
            _ => Err(format!("Unknown base layer: {}", s)),
        }
    }
}

pub fn marker_color(status: TrainingStatus) -> &'static str {
    match status {
        TrainingStatus::Ongoing => "#22c55e",
        TrainingStatus::Planned => "#3b82f6",
        TrainingStatus::Completed => "#6b7280",
        TrainingStatus::Cancelled => "#ef4444",
    }
}

/// Display fields of one program pinned on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub status: TrainingStatus,
    pub color: &'static str,
    pub title: String,
    pub location_name: String,
    pub state: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    pub actual_participants: i32,
    pub target_participants: i32,
}

impl MapMarker {
    /// `None` for programs without coordinates.
    pub fn from_program(program: &TrainingProgram) -> Option<Self> {
        let (latitude, longitude) = program.coordinates()?;
        Some(Self {
            id: program.id,
            latitude,
            longitude,
            status: program.status,
            color: marker_color(program.status),
            title: program.title.clone(),
            location_name: program.location_name.clone(),
            state: program.state.clone(),
            start_date: program.start_date,
            end_date: program.end_date,
            actual_participants: program.actual_participants,
            target_participants: program.target_participants,
        })
    }
}

pub fn markers_from_programs(programs: &[TrainingProgram]) -> Vec<MapMarker> {
    programs.iter().filter_map(MapMarker::from_program).collect()
}

pub type SelectCallback = Box<dyn Fn(&TrainingProgram) + Send + Sync>;

/// What the rest of the service needs from a map provider.
pub trait MarkerRenderer {
    type Output;

    /// Replaces all markers with those of `programs` that have coordinates.
    fn render_markers(&mut self, programs: &[TrainingProgram]) -> Self::Output;

    /// Registers the handler called with the full record of a selected marker.
    fn on_select(&mut self, callback: SelectCallback);

    fn set_base_layer(&mut self, layer: BaseLayer);

    /// Selects the marker for `id`, notifying the select handler.
    fn select(&self, id: Uuid) -> Option<TrainingProgram>;
}
