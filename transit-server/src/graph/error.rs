//! Graph loading error types.

use std::path::PathBuf;

use crate::domain::{RouteKey, StopId};

/// Errors that can occur while loading a transit graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The graph file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The graph file is not valid JSON for the expected schema
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two stops share an id
    #[error("duplicate stop {0}")]
    DuplicateStop(StopId),

    /// Two routes share a route id and direction
    #[error("duplicate route {0}")]
    DuplicateRoute(RouteKey),

    /// A route or walk refers to a stop that is not defined
    #[error("{context} refers to unknown stop {stop}")]
    UnknownStop { context: String, stop: StopId },

    /// A timetable names a day that is not a weekday
    #[error("route {route}: invalid day {day:?}")]
    InvalidDay { route: RouteKey, day: String },

    /// A timetable is attached to a stop the route does not call at
    #[error("route {route}: timetable for stop {stop} which the route does not serve")]
    StrayTimetable { route: RouteKey, stop: StopId },
}
