//! On-disk JSON schema of a transit graph.

use serde::{Deserialize, Serialize};

use crate::domain::DirectionId;

/// Top-level graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    pub stops: Vec<StopEntry>,

    #[serde(default)]
    pub routes: Vec<RouteEntry>,

    #[serde(default)]
    pub walks: Vec<WalkEntry>,
}

/// A bus stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopEntry {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    pub lat: f64,
    pub lon: f64,
}

/// One direction of a route: its stops in travel order and their timetables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub route_id: String,

    #[serde(default)]
    pub direction_id: DirectionId,

    pub stops: Vec<String>,

    #[serde(default)]
    pub timetables: Vec<TimetableEntryColumns>,
}

/// Arrivals of a route direction at one stop on one weekday, as two aligned
/// columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntryColumns {
    /// Weekday name, e.g. `"Monday"`.
    pub day: String,

    pub stop: String,
    pub arrival_times: Vec<String>,
    pub trip_ids: Vec<String>,
}

/// A walking link. Without a distance the straight-line distance is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkEntry {
    pub from: String,
    pub to: String,

    #[serde(default)]
    pub distance_m: Option<f64>,
}
