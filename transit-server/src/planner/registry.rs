//! Earliest known arrival per stop.
//!
//! A registry is created for each search and dropped with it, so concurrent
//! searches never see each other's arrivals.

use std::collections::HashMap;

use crate::domain::{ClockTime, StopId};

use super::state::StateId;

/// The best arrival recorded at a stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestArrival {
    pub state: StateId,
    pub time: ClockTime,
    pub cost: f64,
}

/// Map from stop to its earliest confirmed arrival in the current search.
#[derive(Debug, Default)]
pub struct ArrivalRegistry {
    best: HashMap<StopId, BestArrival>,
}

impl ArrivalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stop: &StopId) -> Option<&BestArrival> {
        self.best.get(stop)
    }

    /// Record an arrival if it is earlier than the one known.
    ///
    /// Returns whether the registry changed.
    pub fn record(&mut self, stop: &StopId, arrival: BestArrival) -> bool {
        match self.best.get(stop) {
            Some(known) if known.time <= arrival.time => false,
            _ => {
                self.best.insert(stop.clone(), arrival);
                true
            }
        }
    }

    /// Whether nothing earlier than `time` has been recorded at `stop`.
    pub fn is_fastest(&self, stop: &StopId, time: ClockTime) -> bool {
        self.best.get(stop).is_none_or(|known| time <= known.time)
    }

    /// Whether a candidate costing `cost` is dominated at `stop`: a known
    /// arrival exists and `cost` exceeds its cost by more than `tolerance`.
    pub fn dominates(&self, stop: &StopId, cost: f64, tolerance: f64) -> bool {
        self.best
            .get(stop)
            .is_some_and(|known| cost > known.cost * tolerance)
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
