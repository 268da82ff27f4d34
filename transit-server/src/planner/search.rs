//! Time-dependent A* search over the bus network.
//!
//! Finds up to `max_paths` itineraries from a point to a point, starting at
//! a given time on a given service day, combining walking with scheduled bus
//! rides. The open set is ordered by estimated total cost; states close
//! enough to the destination are finished off directly rather than expanded.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::time::Instant;

use chrono::Duration;
use tracing::{debug, info, trace, warn};

use crate::domain::{
    ClockTime, DayOfWeek, GeoPoint, PathResult, Place, RouteKey, StopId, travel_minutes,
};

use super::config::{SearchConfig, SearchParams};
use super::path_builder::{Budget, PathBuilder, board};
use super::provider::{Edge, GraphDataProvider, NearbyStop, ProviderError, RouteStop};
use super::reconstruct::reconstruct;
use super::registry::{ArrivalRegistry, BestArrival};
use super::state::{Hop, Mode, SearchState, StateArena, StateId};

/// Which end of the journey a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => write!(f, "starting position"),
            Endpoint::Destination => write!(f, "destination position"),
        }
    }
}

/// Error from itinerary search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The request was rejected before searching
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No stop lies within the search radius of an endpoint
    #[error("no bus stops near the {0}")]
    NoStopsNearEndpoint(Endpoint),

    /// The graph data is inconsistent
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// The graph data provider failed
    #[error(transparent)]
    Provider(ProviderError),

    /// The deadline or expansion cap was hit before any itinerary was found
    #[error("search timed out")]
    Timeout,
}

impl From<ProviderError> for SearchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Integrity(err) => SearchError::DataIntegrity(err.to_string()),
            ProviderError::UnknownStop(stop) => {
                SearchError::DataIntegrity(format!("unknown stop {stop}"))
            }
            other => SearchError::Provider(other),
        }
    }
}

/// Request for itinerary search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,

    /// Service day, 1 (Monday) to 7 (Sunday).
    pub day_of_week: i64,

    /// Departure time as `HH:MM:SS`.
    pub start_time: String,

    /// Number of itineraries wanted.
    pub max_paths: usize,

    pub walk_speed_kmh: f64,
    pub bus_speed_kmh: f64,
    pub max_total_walk_mins: i64,
    pub max_total_wait_mins: i64,
}

impl SearchRequest {
    pub const DEFAULT_MAX_PATHS: usize = 3;
    pub const DEFAULT_WALK_SPEED_KMH: f64 = 5.0;
    pub const DEFAULT_BUS_SPEED_KMH: f64 = 40.0;
    pub const DEFAULT_MAX_TOTAL_WALK_MINS: i64 = 20;
    pub const DEFAULT_MAX_TOTAL_WAIT_MINS: i64 = 20;

    /// Create a request with default speeds and budgets.
    pub fn new(
        origin: GeoPoint,
        destination: GeoPoint,
        day_of_week: i64,
        start_time: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            destination,
            day_of_week,
            start_time: start_time.into(),
            max_paths: Self::DEFAULT_MAX_PATHS,
            walk_speed_kmh: Self::DEFAULT_WALK_SPEED_KMH,
            bus_speed_kmh: Self::DEFAULT_BUS_SPEED_KMH,
            max_total_walk_mins: Self::DEFAULT_MAX_TOTAL_WALK_MINS,
            max_total_wait_mins: Self::DEFAULT_MAX_TOTAL_WAIT_MINS,
        }
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        self.day()?;
        self.start()?;

        if self.max_paths == 0 {
            return Err(SearchError::InvalidParameter(
                "max paths must be at least 1".to_string(),
            ));
        }

        for (name, point) in [("start", self.origin), ("destination", self.destination)] {
            if !point.lat.is_finite()
                || !point.lon.is_finite()
                || !(-90.0..=90.0).contains(&point.lat)
                || !(-180.0..=180.0).contains(&point.lon)
            {
                return Err(SearchError::InvalidParameter(format!(
                    "{name} coordinates out of range: {}, {}",
                    point.lat, point.lon
                )));
            }
        }

        Ok(())
    }

    fn day(&self) -> Result<DayOfWeek, SearchError> {
        DayOfWeek::new(self.day_of_week).map_err(|e| SearchError::InvalidParameter(e.to_string()))
    }

    fn start(&self) -> Result<ClockTime, SearchError> {
        ClockTime::parse_departure(&self.start_time)
            .map_err(|e| SearchError::InvalidParameter(e.to_string()))
    }
}

/// Result of itinerary search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Found itineraries, in the order they were found.
    pub paths: Vec<PathResult>,

    /// Number of states taken off the open set.
    pub states_expanded: usize,
}

/// Itinerary planner using time-dependent A*.
pub struct Planner<'a, P: GraphDataProvider> {
    provider: &'a P,
    config: &'a SearchConfig,
}

impl<'a, P: GraphDataProvider> Planner<'a, P> {
    /// Create a new planner.
    pub fn new(provider: &'a P, config: &'a SearchConfig) -> Self {
        Self { provider, config }
    }

    /// Search for itineraries from the request's origin to its destination.
    ///
    /// Itineraries come back in the order they were found. Two leaves that
    /// describe the same itinerary are reported once.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let explored = self.explore(request)?;

        let mut paths: Vec<PathResult> = Vec::with_capacity(explored.leaves.len());
        for &leaf in &explored.leaves {
            let path = reconstruct(&explored.arena, leaf);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        Ok(SearchResult {
            paths,
            states_expanded: explored.expanded,
        })
    }

    /// Run the search, keeping the whole state arena.
    pub(super) fn explore(&self, request: &SearchRequest) -> Result<Explored, SearchError> {
        request.validate()?;
        let day = request.day()?;
        let start = request.start()?;
        let params = SearchParams::from_request(request, self.config)?;

        info!(
            day = %day,
            start = %start,
            max_paths = request.max_paths,
            max_single_wait = params.max_single_wait_mins,
            "Starting search"
        );

        let origin_stops = self
            .provider
            .nearest_stops_per_route(request.origin, self.config.search_radius_m)?;
        if origin_stops.is_empty() {
            return Err(SearchError::NoStopsNearEndpoint(Endpoint::Origin));
        }

        let mut destination_stops = self
            .provider
            .nearest_stops_per_route(request.destination, self.config.search_radius_m)?;
        if destination_stops.is_empty() {
            return Err(SearchError::NoStopsNearEndpoint(Endpoint::Destination));
        }

        // Only stops that bring the rider closer than where they started
        let direct_m = request.origin.distance_m(&request.destination);
        destination_stops.retain(|_, nearby| nearby.distance_m < direct_m);

        // There is no point asking for more itineraries than there are ways
        // to leave the origin
        let max_paths = request.max_paths.min(origin_stops.len());

        let mut run = SearchRun {
            provider: self.provider,
            config: self.config,
            params,
            day,
            destination: request.destination,
            destination_stops,
            arena: StateArena::new(),
            registry: ArrivalRegistry::new(),
            open: BinaryHeap::new(),
            closed: HashSet::new(),
            heuristics: HashMap::new(),
            sequence: 0,
            expanded: 0,
            found: Vec::new(),
        };

        if run.destination_stops.is_empty() {
            debug!(direct_m, "No stop closer to the destination, walking");
            let leaf = run.walk_only(start, direct_m);
            return Ok(Explored {
                arena: run.arena,
                leaves: vec![leaf],
                expanded: 0,
            });
        }

        run.seed(start, &origin_stops)?;
        let completed = run.expand(max_paths)?;

        info!(
            leaves = run.found.len(),
            states_expanded = run.expanded,
            states = run.arena.len(),
            stops_reached = run.registry.len(),
            "Search complete"
        );

        if !completed && run.found.is_empty() {
            return Err(SearchError::Timeout);
        }

        Ok(Explored {
            arena: run.arena,
            leaves: run.found,
            expanded: run.expanded,
        })
    }
}

/// The states left behind by one search and the leaves that reached the
/// destination, in the order found.
pub(super) struct Explored {
    pub arena: StateArena,
    pub leaves: Vec<StateId>,
    pub expanded: usize,
}

/// An open-set entry. Orders so that the lowest estimate pops first, and
/// among equal estimates the earliest pushed.
#[derive(Debug, Clone, Copy)]
struct Queued {
    estimate: f64,
    sequence: u64,
    state: StateId,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Everything owned by one call to [`Planner::search`].
struct SearchRun<'r, P: GraphDataProvider> {
    provider: &'r P,
    config: &'r SearchConfig,
    params: SearchParams,
    day: DayOfWeek,
    destination: GeoPoint,
    destination_stops: BTreeMap<RouteKey, NearbyStop>,
    arena: StateArena,
    registry: ArrivalRegistry,
    open: BinaryHeap<Queued>,
    closed: HashSet<(StopId, Mode)>,

    /// Distance from each stop to the destination (metres).
    heuristics: HashMap<StopId, f64>,

    sequence: u64,
    expanded: usize,
    found: Vec<StateId>,
}

impl<P: GraphDataProvider> SearchRun<'_, P> {
    fn builder(&mut self) -> PathBuilder<'_> {
        PathBuilder {
            arena: &mut self.arena,
            registry: &mut self.registry,
            config: self.config,
            params: &self.params,
            destination: self.destination,
        }
    }

    /// Estimated minutes from `stop` to the destination at bus speed.
    fn heuristic(&mut self, stop: &StopId) -> Result<f64, SearchError> {
        let distance_m = match self.heuristics.get(stop) {
            Some(&d) => d,
            None => {
                let d = self.provider.distance_to(stop, self.destination)?;
                self.heuristics.insert(stop.clone(), d);
                d
            }
        };
        Ok(travel_minutes(distance_m, self.params.bus_speed_kmh))
    }

    fn enqueue(&mut self, state: StateId) {
        self.open.push(Queued {
            estimate: self.arena[state].estimate,
            sequence: self.sequence,
            state,
        });
        self.sequence += 1;
    }

    /// A single walk from the origin straight to the destination.
    fn walk_only(&mut self, start: ClockTime, distance_m: f64) -> StateId {
        let root = self.arena.push(SearchState::root(Place::Origin, start));
        let minutes = travel_minutes(distance_m, self.params.walk_speed_kmh);
        self.builder().finish_on_foot(root, minutes)
    }

    /// Queue one state per distinct stop near the origin.
    ///
    /// A rider already standing at a stop starts there with no walk. Every
    /// stop in range is seeded, however long the walk to it.
    fn seed(
        &mut self,
        start: ClockTime,
        origin_stops: &BTreeMap<RouteKey, NearbyStop>,
    ) -> Result<(), SearchError> {
        let root = self.arena.push(SearchState::root(Place::Origin, start));
        let mut seen = HashSet::new();

        for nearby in origin_stops.values() {
            if !seen.insert(nearby.stop.clone()) {
                continue;
            }
            let heuristic = self.heuristic(&nearby.stop)?;

            let state = if nearby.distance_m < self.config.at_stop_threshold_m {
                let mut state = SearchState::root(Place::Stop(nearby.stop.clone()), start);
                state.estimate = heuristic.max(0.0);
                self.arena.push(state)
            } else {
                let minutes = travel_minutes(nearby.distance_m, self.params.walk_speed_kmh);
                let walk_mins = minutes.ceil() as u32;
                self.arena.extend(
                    root,
                    Hop {
                        place: Place::Stop(nearby.stop.clone()),
                        mode: Mode::Walk,
                        trip: None,
                        time: start + Duration::minutes(i64::from(walk_mins)),
                        wait_mins: 0,
                        walk_mins,
                        cost: minutes,
                        heuristic,
                    },
                )
            };

            let seeded = &self.arena[state];
            let arrival = BestArrival {
                state,
                time: seeded.time,
                cost: seeded.cost,
            };
            self.registry.record(&nearby.stop, arrival);
            self.enqueue(state);
        }

        debug!(seeds = self.open.len(), "Seeded open set");
        Ok(())
    }

    /// Run the main loop until enough itineraries are found or the open set
    /// is exhausted.
    ///
    /// Returns `false` if the deadline or expansion cap ended the search early.
    fn expand(&mut self, max_paths: usize) -> Result<bool, SearchError> {
        let started = Instant::now();

        while self.found.len() < max_paths {
            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    warn!(found = self.found.len(), "Search deadline reached");
                    return Ok(false);
                }
            }
            if self.expanded >= self.config.max_expansions {
                warn!(found = self.found.len(), "Search expansion cap reached");
                return Ok(false);
            }

            let Some(Queued { state: id, .. }) = self.open.pop() else {
                break;
            };
            let state = &self.arena[id];
            let Some(stop) = state.place.stop().cloned() else {
                continue;
            };
            if !self.closed.insert((stop.clone(), state.mode.clone())) {
                continue;
            }
            self.expanded += 1;

            trace!(
                stop = %stop,
                time = %state.time,
                cost = state.cost,
                estimate = state.estimate,
                transfers = state.transfers,
                "Expanding state"
            );

            if self.try_direct_hit(id, &stop)? {
                continue;
            }
            if self.try_walk_shortcut(id, &stop)? {
                continue;
            }
            self.expand_neighbors(id, &stop)?;
        }

        Ok(true)
    }

    /// If the state's route also serves a stop near the destination, ride it
    /// there. The state is not expanded further either way.
    fn try_direct_hit(&mut self, id: StateId, stop: &StopId) -> Result<bool, SearchError> {
        let state = &self.arena[id];
        let Some(key) = state.mode.route_key().cloned() else {
            return Ok(false);
        };
        let Some(target) = self.destination_stops.get(&key) else {
            return Ok(false);
        };

        // A faster way to this stop has already been tried
        if !self.registry.is_fastest(stop, state.time) {
            return Ok(true);
        }

        // Already at the stop nearest the destination on this route
        if &target.stop == stop {
            let distance_m = self.provider.distance_to(stop, self.destination)?;
            let minutes = travel_minutes(distance_m, self.params.walk_speed_kmh);
            if minutes <= self.config.max_walk_leg_mins as f64 {
                debug!(stop = %stop, route = %key, "Arrived by the destination");
                let leaf = self.builder().finish_on_foot(id, minutes);
                self.found.push(leaf);
            }
            return Ok(true);
        }

        let candidates = [RouteStop {
            key: key.clone(),
            stop: target.stop.clone(),
        }];
        let segments = self
            .provider
            .route_segments_to(stop, &candidates, self.day)?;

        if let Some(segment) = segments.iter().find(|s| s.key == key) {
            if let Some(leaf) = self
                .builder()
                .ride(id, &key, &segment.records, Budget::Unconstrained)
            {
                debug!(stop = %stop, route = %key, "Direct route to destination");
                self.found.push(leaf);
            }
        }
        Ok(true)
    }

    /// Finish states within walking distance of the destination.
    ///
    /// A rider who walked here tries every transfer-free ride to a stop near
    /// the destination, or walks the rest. A rider on a bus stays on toward
    /// the destination, or walks the rest.
    fn try_walk_shortcut(&mut self, id: StateId, stop: &StopId) -> Result<bool, SearchError> {
        let state = &self.arena[id];
        let walk_mins =
            (state.estimate - state.cost) * self.params.bus_speed_kmh / self.params.walk_speed_kmh;
        if walk_mins >= self.config.max_walk_leg_mins as f64 {
            return Ok(false);
        }

        match state.mode.clone() {
            Mode::Walk => {
                let candidates: Vec<RouteStop> = self
                    .destination_stops
                    .iter()
                    .map(|(key, nearby)| RouteStop {
                        key: key.clone(),
                        stop: nearby.stop.clone(),
                    })
                    .collect();
                let segments = self
                    .provider
                    .route_segments_to(stop, &candidates, self.day)?;

                let before = self.found.len();
                for segment in &segments {
                    if segment.records.len() < 2
                        || self.arena.has_ridden_route(id, &segment.key.route)
                    {
                        continue;
                    }
                    if let Some(leaf) =
                        self.builder()
                            .ride(id, &segment.key, &segment.records, Budget::Constrained)
                    {
                        self.found.push(leaf);
                    }
                }

                if self.found.len() == before {
                    let leaf = self.builder().finish_on_foot(id, walk_mins);
                    self.found.push(leaf);
                }
                debug!(
                    stop = %stop,
                    rides = segments.len(),
                    found = self.found.len() - before,
                    "Walk shortcut"
                );
            }
            Mode::Bus(key) => {
                let records = self.provider.route_segment_toward(
                    stop,
                    &key,
                    self.day,
                    self.destination,
                )?;
                let ridden = self
                    .builder()
                    .ride(id, &key, &records, Budget::Constrained);
                let leaf = match ridden {
                    Some(leaf) => leaf,
                    None => self.builder().finish_on_foot(id, walk_mins),
                };
                debug!(stop = %stop, route = %key, "Riding on toward destination");
                self.found.push(leaf);
            }
        }

        Ok(true)
    }

    /// Queue every neighbor of the state that survives pruning.
    fn expand_neighbors(&mut self, id: StateId, stop: &StopId) -> Result<(), SearchError> {
        let edges = self.provider.neighbors(stop, self.day)?;

        for edge in edges {
            let to = edge.to().clone();
            let Some(mut hop) = self.resolve(id, &edge) else {
                continue;
            };
            if !self.admissible(id, &to, &hop) {
                continue;
            }

            hop.heuristic = self.heuristic(&to)?;
            let next = self.arena.extend(id, hop);

            let state = &self.arena[next];
            let arrival = BestArrival {
                state: next,
                time: state.time,
                cost: state.cost,
            };
            self.registry.record(&to, arrival);
            self.enqueue(next);
        }

        Ok(())
    }

    /// Turn an edge into a concrete move, or `None` if it can't be taken now.
    fn resolve(&self, id: StateId, edge: &Edge) -> Option<Hop> {
        let state = &self.arena[id];

        match edge {
            Edge::Scheduled {
                to,
                key,
                departures,
                arrivals,
            } => board(
                state,
                key,
                to,
                departures,
                arrivals,
                Some(self.params.max_single_wait()),
                self.config.transfer_buffer(),
            ),
            Edge::Walk { to, distance_m } => {
                let minutes = travel_minutes(*distance_m, self.params.walk_speed_kmh);
                if minutes > self.config.max_walk_leg_mins as f64 {
                    return None;
                }
                let walk_mins = minutes.ceil() as u32;
                Some(Hop {
                    place: Place::Stop(to.clone()),
                    mode: Mode::Walk,
                    trip: None,
                    time: state.time.checked_add(Duration::minutes(i64::from(walk_mins)))?,
                    wait_mins: 0,
                    walk_mins,
                    cost: minutes,
                    heuristic: 0.0,
                })
            }
        }
    }

    /// Whether a move survives the budget, tolerance and transfer rules.
    fn admissible(&self, id: StateId, to: &StopId, hop: &Hop) -> bool {
        let state = &self.arena[id];
        let cost = state.cost + hop.cost;
        let wait = i64::from(state.wait_mins + hop.wait_mins);
        let walk = i64::from(state.walk_mins + hop.walk_mins);

        // Only walking hops are held to the walk budget
        if self
            .registry
            .dominates(to, cost, self.config.time_tolerance)
            || wait > self.params.max_total_wait_mins
            || (hop.walk_mins > 0 && walk > self.params.max_total_walk_mins)
            || cost > self.config.cost_upper_bound()
        {
            return false;
        }

        if let Some(key) = hop.mode.route_key() {
            if self.arena.is_transfer(id, hop.wait_mins)
                && (state.transfers >= self.config.max_transfers
                    || self.arena.has_ridden_route(id, &key.route))
            {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(estimate: f64, sequence: u64) -> Queued {
        Queued {
            estimate,
            sequence,
            state: StateId::default(),
        }
    }

    #[test]
    fn open_set_pops_lowest_estimate_first() {
        let mut open = BinaryHeap::new();
        open.push(queued(12.0, 0));
        open.push(queued(3.5, 1));
        open.push(queued(7.0, 2));
        open.push(queued(3.5, 3));

        let order: Vec<_> = std::iter::from_fn(|| open.pop())
            .map(|q| (q.estimate, q.sequence))
            .collect();
        assert_eq!(order, vec![(3.5, 1), (3.5, 3), (7.0, 2), (12.0, 0)]);
    }

    #[test]
    fn request_defaults() {
        let req = SearchRequest::new(
            GeoPoint::new(49.28, -123.12),
            GeoPoint::new(49.26, -123.25),
            3,
            "08:30:00",
        );

        assert_eq!(req.max_paths, 3);
        assert_eq!(req.walk_speed_kmh, 5.0);
        assert_eq!(req.bus_speed_kmh, 40.0);
        assert_eq!(req.max_total_walk_mins, 20);
        assert_eq!(req.max_total_wait_mins, 20);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn invalid_requests() {
        let base = SearchRequest::new(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.01),
            1,
            "08:00:00",
        );

        let mut req = base.clone();
        req.start_time = "8am".to_string();
        assert!(matches!(req.validate(), Err(SearchError::InvalidParameter(_))));

        let mut req = base.clone();
        req.start_time = "24:00:00".to_string();
        assert!(matches!(req.validate(), Err(SearchError::InvalidParameter(_))));

        let mut req = base.clone();
        req.max_paths = 0;
        assert!(matches!(req.validate(), Err(SearchError::InvalidParameter(_))));

        let mut req = base;
        req.destination = GeoPoint::new(91.0, 0.0);
        assert!(matches!(req.validate(), Err(SearchError::InvalidParameter(_))));
    }

    #[test]
    fn error_display() {
        let err = SearchError::NoStopsNearEndpoint(Endpoint::Origin);
        assert_eq!(err.to_string(), "no bus stops near the starting position");

        let err = SearchError::from(ProviderError::UnknownStop(StopId::new("X")));
        assert!(matches!(err, SearchError::DataIntegrity(_)));

        let err = SearchError::from(ProviderError::Backend("down".into()));
        assert_eq!(err.to_string(), "graph store failure: down");
    }
}
