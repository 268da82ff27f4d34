//! Search configuration for the transit planner.
//!
//! [`SearchConfig`] holds the fixed tuning of the engine and may be shared
//! between requests. [`SearchParams`] holds the speeds and budgets of one
//! request and is derived from it; it never outlives the search.

use chrono::Duration;

use super::search::{SearchError, SearchRequest};

/// Fixed engine constants.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Radius around each endpoint searched for stops (metres).
    pub search_radius_m: f64,

    /// Walks shorter than this are treated as already being at the stop (metres).
    pub at_stop_threshold_m: f64,

    /// Longest single walking leg (minutes).
    pub max_walk_leg_mins: i64,

    /// Minimum time between reaching a stop and boarding there (minutes).
    pub transfer_buffer_mins: i64,

    /// Maximum number of transfers in one itinerary.
    pub max_transfers: u32,

    /// Candidates costing more than this multiple of the best known arrival
    /// at the same stop are pruned.
    pub time_tolerance: f64,

    /// Upper bound on itinerary duration before tolerance (minutes).
    pub max_journey_mins: i64,

    /// Wall-clock budget for one search. `None` disables the deadline.
    pub deadline: Option<std::time::Duration>,

    /// Maximum number of states popped from the open set.
    pub max_expansions: usize,
}

impl SearchConfig {
    /// Returns the transfer buffer as a Duration.
    pub fn transfer_buffer(&self) -> Duration {
        Duration::minutes(self.transfer_buffer_mins)
    }

    /// Cost above which any candidate is pruned (minutes).
    pub fn cost_upper_bound(&self) -> f64 {
        self.max_journey_mins as f64 * self.time_tolerance
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_radius_m: 1250.0, // about a 15 minute walk
            at_stop_threshold_m: 5.0,
            max_walk_leg_mins: 30,
            transfer_buffer_mins: 5,
            max_transfers: 5,
            time_tolerance: 1.5,
            max_journey_mins: 24 * 60,
            deadline: Some(std::time::Duration::from_secs(10)),
            max_expansions: 10_000,
        }
    }
}

/// Speeds and budgets of a single search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub walk_speed_kmh: f64,
    pub bus_speed_kmh: f64,

    /// Total walking allowed across the itinerary (minutes).
    pub max_total_walk_mins: i64,

    /// Total waiting allowed across the itinerary (minutes).
    pub max_total_wait_mins: i64,

    /// Longest single wait for a vehicle (minutes).
    pub max_single_wait_mins: i64,
}

impl SearchParams {
    /// Walk speed bounds (km/h).
    pub const WALK_SPEED_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

    /// Bus speed bounds (km/h).
    pub const BUS_SPEED_RANGE: std::ops::RangeInclusive<f64> = 20.0..=80.0;

    /// Derive the parameters of a request.
    ///
    /// The single-wait cap scales with how much faster the bus is than
    /// walking: waiting is worth more when the bus saves more walking.
    pub fn from_request(
        request: &SearchRequest,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        if !Self::WALK_SPEED_RANGE.contains(&request.walk_speed_kmh) {
            return Err(SearchError::InvalidParameter(format!(
                "average walk speed must be between 1 and 10 km/h, got {}",
                request.walk_speed_kmh
            )));
        }
        if !Self::BUS_SPEED_RANGE.contains(&request.bus_speed_kmh) {
            return Err(SearchError::InvalidParameter(format!(
                "average bus speed must be between 20 and 80 km/h, got {}",
                request.bus_speed_kmh
            )));
        }
        if request.max_total_walk_mins < 0 || request.max_total_wait_mins < 0 {
            return Err(SearchError::InvalidParameter(
                "walk and wait budgets must not be negative".to_string(),
            ));
        }

        let ratio = request.bus_speed_kmh / request.walk_speed_kmh;
        let max_single_wait_mins =
            (config.max_walk_leg_mins as f64 * ratio * 3.0 / 40.0).floor() as i64;

        Ok(Self {
            walk_speed_kmh: request.walk_speed_kmh,
            bus_speed_kmh: request.bus_speed_kmh,
            max_total_walk_mins: request.max_total_walk_mins,
            max_total_wait_mins: request.max_total_wait_mins,
            max_single_wait_mins,
        })
    }

    /// Returns the single-wait cap as a Duration.
    pub fn max_single_wait(&self) -> Duration {
        Duration::minutes(self.max_single_wait_mins)
    }
}
