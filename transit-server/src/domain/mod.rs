//! Domain types for the transit planner.
//!
//! This module contains the validated value types shared by the planner, the
//! graph store and the web layer. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod error;
mod geo;
mod ids;
mod path;
mod time;
mod timetable;

pub use error::DomainError;
pub use geo::{GeoPoint, travel_minutes};
pub use ids::{DirectionId, RouteId, RouteKey, StopId, TripId};
pub use path::{PathResult, PathSegment, Place, SegmentType};
pub use time::{ClockTime, DayOfWeek, InvalidDay, TimeError};
pub use timetable::{Timetable, TimetableEntry};
