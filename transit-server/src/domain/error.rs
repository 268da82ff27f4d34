//! Domain error types.
//!
//! These errors represent data inconsistencies found while validating feed
//! records. They are distinct from provider and search errors.

use super::{StopId, TimeError};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Arrival-time and trip-id columns of a timetable differ in length
    #[error("timetable at stop {stop}: {arrivals} arrival times but {trips} trip ids")]
    TimetableLengthMismatch {
        stop: StopId,
        arrivals: usize,
        trips: usize,
    },

    /// A timetable arrival time could not be parsed
    #[error("timetable at stop {stop}: {source}")]
    BadArrivalTime { stop: StopId, source: TimeError },
}
