//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, PathResult, PathSegment};
use crate::planner::{SearchRequest, SearchResult};

/// Request to plan paths between two points.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPathsRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,

    /// 1 = Monday through 7 = Sunday
    pub day_of_week: i64,

    /// Departure time, `HH:MM:SS`
    pub start_time: String,

    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    #[serde(default = "default_walk_speed")]
    pub walk_speed_kmh: f64,

    #[serde(default = "default_bus_speed")]
    pub bus_speed_kmh: f64,

    #[serde(default = "default_max_walk")]
    pub max_total_walk_minutes: i64,

    #[serde(default = "default_max_wait")]
    pub max_total_wait_minutes: i64,
}

fn default_max_paths() -> usize {
    SearchRequest::DEFAULT_MAX_PATHS
}

fn default_walk_speed() -> f64 {
    SearchRequest::DEFAULT_WALK_SPEED_KMH
}

fn default_bus_speed() -> f64 {
    SearchRequest::DEFAULT_BUS_SPEED_KMH
}

fn default_max_walk() -> i64 {
    SearchRequest::DEFAULT_MAX_TOTAL_WALK_MINS
}

fn default_max_wait() -> i64 {
    SearchRequest::DEFAULT_MAX_TOTAL_WAIT_MINS
}

impl PlanPathsRequest {
    pub fn to_search_request(&self) -> SearchRequest {
        SearchRequest {
            max_paths: self.max_paths,
            walk_speed_kmh: self.walk_speed_kmh,
            bus_speed_kmh: self.bus_speed_kmh,
            max_total_walk_mins: self.max_total_walk_minutes,
            max_total_wait_mins: self.max_total_wait_minutes,
            ..SearchRequest::new(
                GeoPoint::new(self.start_lat, self.start_lon),
                GeoPoint::new(self.dest_lat, self.dest_lon),
                self.day_of_week,
                self.start_time.clone(),
            )
        }
    }
}

/// Response from path planning.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPathsResponse {
    pub paths: Vec<PathView>,
    pub states_expanded: usize,
}

impl PlanPathsResponse {
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            paths: result.paths.iter().map(PathView::from_path).collect(),
            states_expanded: result.states_expanded,
        }
    }
}

/// A complete itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathView {
    pub segments: Vec<SegmentView>,
    pub total_transfers: u32,
    pub total_wait_minutes: u32,
    pub total_walk_minutes: u32,
    pub departure: String,
    pub arrival: String,
}

impl PathView {
    pub fn from_path(path: &PathResult) -> Self {
        Self {
            segments: path.segments().iter().map(SegmentView::from_segment).collect(),
            total_transfers: path.total_transfers(),
            total_wait_minutes: path.total_wait_minutes(),
            total_walk_minutes: path.total_walk_minutes(),
            departure: path.departure().to_string(),
            arrival: path.arrival().to_string(),
        }
    }
}

/// One segment of an itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentView {
    /// Stop ids in travel order; the endpoints appear as `origin` and
    /// `destination`.
    pub stop_ids: Vec<String>,

    pub route_id: Option<String>,
    pub direction_id: Option<u8>,

    /// `WALK` or `BUS`
    pub segment_type: &'static str,

    pub wait_minutes: u32,
}

impl SegmentView {
    pub fn from_segment(segment: &PathSegment) -> Self {
        Self {
            stop_ids: segment.places.iter().map(|p| p.to_string()).collect(),
            route_id: segment.route.as_ref().map(|r| r.to_string()),
            direction_id: segment.direction.map(|d| d.0),
            segment_type: segment.segment_type.as_str(),
            wait_minutes: segment.wait_minutes,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
