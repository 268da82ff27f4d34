//! Itinerary types returned by the planner.

use std::fmt;

use super::{ClockTime, DirectionId, RouteId, StopId};

/// A point an itinerary passes through.
///
/// The trip starts and ends at arbitrary coordinates, which are represented
/// by the two synthetic places either side of the real stops.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Place {
    Origin,
    Stop(StopId),
    Destination,
}

impl Place {
    /// The stop id, if this is a real stop.
    pub fn stop(&self) -> Option<&StopId> {
        match self {
            Place::Stop(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Origin => f.write_str("origin"),
            Place::Stop(id) => write!(f, "{id}"),
            Place::Destination => f.write_str("destination"),
        }
    }
}

/// How a segment is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    Walk,
    Bus,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Walk => "WALK",
            SegmentType::Bus => "BUS",
        }
    }
}

/// A maximal run of places travelled by one mode.
///
/// Consecutive segments share their boundary place: a bus segment ends at the
/// stop where the next walk begins.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Places in travel order.
    pub places: Vec<Place>,

    /// Route ridden, `None` for walking.
    pub route: Option<RouteId>,

    /// Direction ridden, `None` for walking.
    pub direction: Option<DirectionId>,

    pub segment_type: SegmentType,

    /// Minutes spent waiting for this segment's vehicle.
    pub wait_minutes: u32,
}

/// One complete itinerary from origin to destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    segments: Vec<PathSegment>,
    total_transfers: u32,
    total_wait_minutes: u32,
    total_walk_minutes: u32,
    departure: ClockTime,
    arrival: ClockTime,
}

impl PathResult {
    pub fn new(
        segments: Vec<PathSegment>,
        total_transfers: u32,
        total_wait_minutes: u32,
        total_walk_minutes: u32,
        departure: ClockTime,
        arrival: ClockTime,
    ) -> Self {
        Self {
            segments,
            total_transfers,
            total_wait_minutes,
            total_walk_minutes,
            departure,
            arrival,
        }
    }

    /// Segments in travel order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn total_transfers(&self) -> u32 {
        self.total_transfers
    }

    pub fn total_wait_minutes(&self) -> u32 {
        self.total_wait_minutes
    }

    pub fn total_walk_minutes(&self) -> u32 {
        self.total_walk_minutes
    }

    /// Time the rider leaves the origin.
    pub fn departure(&self) -> ClockTime {
        self.departure
    }

    /// Time the rider reaches the destination.
    pub fn arrival(&self) -> ClockTime {
        self.arrival
    }

    /// Number of bus segments.
    pub fn bus_segment_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.segment_type == SegmentType::Bus)
            .count()
    }

    /// Whether the itinerary is walking only.
    pub fn is_walk_only(&self) -> bool {
        self.bus_segment_count() == 0
    }
}
