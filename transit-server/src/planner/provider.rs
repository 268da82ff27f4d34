//! The graph-store boundary consumed by the planner.
//!
//! The planner never queries stops, routes or timetables directly. It asks a
//! [`GraphDataProvider`] a handful of questions and receives typed records
//! whose timetables have already been validated.

use std::collections::BTreeMap;

use crate::domain::{DayOfWeek, DomainError, GeoPoint, RouteKey, StopId, Timetable};

/// Error raised by a graph data provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// A stop referenced by the graph has no record
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// Stored data failed validation
    #[error(transparent)]
    Integrity(#[from] DomainError),

    /// The backing store failed
    #[error("graph store failure: {0}")]
    Backend(String),
}

/// The closest stop serving some route direction near a point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    pub stop: StopId,
    pub distance_m: f64,
}

/// A stop on a route segment, with its timetable for that route direction
/// and service day.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub stop: StopId,
    pub point: GeoPoint,
    pub timetable: Timetable,
}

/// Consecutive stops of one route direction, in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub key: RouteKey,
    pub records: Vec<StopRecord>,
}

/// A candidate alighting stop on a particular route direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub key: RouteKey,
    pub stop: StopId,
}

/// An edge leaving a stop.
#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    /// The next stop of a route direction. Carries the timetables of both
    /// ends so the planner can pick a trip and its arrival.
    Scheduled {
        to: StopId,
        key: RouteKey,
        departures: Timetable,
        arrivals: Timetable,
    },

    /// A walking link to a nearby stop.
    Walk { to: StopId, distance_m: f64 },
}

impl Edge {
    /// The stop the edge leads to.
    pub fn to(&self) -> &StopId {
        match self {
            Edge::Scheduled { to, .. } | Edge::Walk { to, .. } => to,
        }
    }
}

/// Trait for answering the planner's graph questions.
///
/// Calls are synchronous; the planner blocks on each. This abstraction
/// allows the planner to be tested with mock data.
pub trait GraphDataProvider {
    /// The closest stop per route direction within `radius_m` of `point`.
    fn nearest_stops_per_route(
        &self,
        point: GeoPoint,
        radius_m: f64,
    ) -> Result<BTreeMap<RouteKey, NearbyStop>, ProviderError>;

    /// Scheduled and walking edges leaving `stop` on `day`.
    fn neighbors(&self, stop: &StopId, day: DayOfWeek) -> Result<Vec<Edge>, ProviderError>;

    /// Stops of `key` from `from` onwards, cut after the stop closest to
    /// `destination`. Empty when the route does not run from `from` on `day`.
    fn route_segment_toward(
        &self,
        from: &StopId,
        key: &RouteKey,
        day: DayOfWeek,
        destination: GeoPoint,
    ) -> Result<Vec<StopRecord>, ProviderError>;

    /// For each candidate whose route direction runs from `from` to the
    /// candidate stop without a change on `day`, the stops between them.
    /// The candidate must lie beyond `from`, so every segment has at least
    /// one hop.
    fn route_segments_to(
        &self,
        from: &StopId,
        candidates: &[RouteStop],
        day: DayOfWeek,
    ) -> Result<Vec<RouteSegment>, ProviderError>;

    /// Straight-line distance from `stop` to `point`, in metres.
    fn distance_to(&self, stop: &StopId, point: GeoPoint) -> Result<f64, ProviderError>;
}
