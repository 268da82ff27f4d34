//! Scenario tests for the A* itinerary search.
//!
//! Networks are laid out along the equator, where 0.01 degrees of longitude
//! is about 1.1 km: 13 minutes on foot or under 2 minutes by bus.

use super::*;
use crate::domain::{
    ClockTime, DayOfWeek, GeoPoint, PathResult, Place, RouteId, RouteKey, SegmentType, StopId,
    Timetable,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

fn pt(lon: f64) -> GeoPoint {
    GeoPoint::new(0.0, lon)
}

fn time(s: &str) -> ClockTime {
    ClockTime::parse_hms(s).unwrap()
}

fn stop(id: &str) -> Place {
    Place::Stop(StopId::new(id))
}

struct MockCall {
    stop: StopId,
    arrival_times: Vec<String>,
    trip_ids: Vec<String>,
}

struct MockRoute {
    key: RouteKey,
    calls: Vec<MockCall>,
}

/// Mock graph store. Timetables are kept as raw columns and validated on
/// every lookup, like a real store would.
struct MockProvider {
    stops: HashMap<StopId, GeoPoint>,
    routes: Vec<MockRoute>,
    walks: Vec<(StopId, StopId, f64)>,
    backend_down: bool,
    call_count: Mutex<usize>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            stops: HashMap::new(),
            routes: Vec::new(),
            walks: Vec::new(),
            backend_down: false,
            call_count: Mutex::new(0),
        }
    }

    fn add_stop(&mut self, id: &str, lon: f64) {
        self.stops.insert(StopId::new(id), pt(lon));
    }

    /// Add a route in direction 0. Each call is a stop and its
    /// `(arrival, trip)` rows.
    fn add_route(&mut self, route: &str, calls: &[(&str, &[(&str, &str)])]) {
        let calls = calls
            .iter()
            .map(|(stop, rows)| MockCall {
                stop: StopId::new(*stop),
                arrival_times: rows.iter().map(|(t, _)| t.to_string()).collect(),
                trip_ids: rows.iter().map(|(_, trip)| trip.to_string()).collect(),
            })
            .collect();
        self.routes.push(MockRoute {
            key: RouteKey::new(route, 0),
            calls,
        });
    }

    fn add_walk(&mut self, from: &str, to: &str, distance_m: f64) {
        self.walks
            .push((StopId::new(from), StopId::new(to), distance_m));
    }

    fn api_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn count_call(&self) -> Result<(), ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        if self.backend_down {
            return Err(ProviderError::Backend("connection refused".to_string()));
        }
        Ok(())
    }

    fn point(&self, stop: &StopId) -> Result<GeoPoint, ProviderError> {
        self.stops
            .get(stop)
            .copied()
            .ok_or_else(|| ProviderError::UnknownStop(stop.clone()))
    }

    fn timetable(&self, call: &MockCall) -> Result<Timetable, ProviderError> {
        Ok(Timetable::from_columns(
            &call.stop,
            &call.arrival_times,
            &call.trip_ids,
        )?)
    }

    fn record(&self, call: &MockCall) -> Result<StopRecord, ProviderError> {
        Ok(StopRecord {
            stop: call.stop.clone(),
            point: self.point(&call.stop)?,
            timetable: self.timetable(call)?,
        })
    }

    fn position(route: &MockRoute, stop: &StopId) -> Option<usize> {
        route.calls.iter().position(|c| &c.stop == stop)
    }
}

impl GraphDataProvider for MockProvider {
    fn nearest_stops_per_route(
        &self,
        point: GeoPoint,
        radius_m: f64,
    ) -> Result<BTreeMap<RouteKey, NearbyStop>, ProviderError> {
        self.count_call()?;
        let mut nearest = BTreeMap::new();
        for route in &self.routes {
            let mut best: Option<NearbyStop> = None;
            for call in &route.calls {
                let distance_m = self.point(&call.stop)?.distance_m(&point);
                if distance_m <= radius_m && best.as_ref().is_none_or(|b| distance_m < b.distance_m)
                {
                    best = Some(NearbyStop {
                        stop: call.stop.clone(),
                        distance_m,
                    });
                }
            }
            if let Some(best) = best {
                nearest.insert(route.key.clone(), best);
            }
        }
        Ok(nearest)
    }

    fn neighbors(&self, stop: &StopId, _day: DayOfWeek) -> Result<Vec<Edge>, ProviderError> {
        self.count_call()?;
        let mut edges = Vec::new();
        for route in &self.routes {
            let Some(i) = Self::position(route, stop) else {
                continue;
            };
            let Some(next) = route.calls.get(i + 1) else {
                continue;
            };
            edges.push(Edge::Scheduled {
                to: next.stop.clone(),
                key: route.key.clone(),
                departures: self.timetable(&route.calls[i])?,
                arrivals: self.timetable(next)?,
            });
        }
        for (a, b, distance_m) in &self.walks {
            if a == stop {
                edges.push(Edge::Walk {
                    to: b.clone(),
                    distance_m: *distance_m,
                });
            } else if b == stop {
                edges.push(Edge::Walk {
                    to: a.clone(),
                    distance_m: *distance_m,
                });
            }
        }
        Ok(edges)
    }

    fn route_segment_toward(
        &self,
        from: &StopId,
        key: &RouteKey,
        _day: DayOfWeek,
        destination: GeoPoint,
    ) -> Result<Vec<StopRecord>, ProviderError> {
        self.count_call()?;
        let Some(route) = self.routes.iter().find(|r| &r.key == key) else {
            return Ok(Vec::new());
        };
        let Some(start) = Self::position(route, from) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for call in &route.calls[start..] {
            records.push(self.record(call)?);
        }
        let closest = records
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.point
                    .distance_m(&destination)
                    .total_cmp(&b.point.distance_m(&destination))
            })
            .map_or(0, |(i, _)| i);
        records.truncate(closest + 1);
        Ok(records)
    }

    fn route_segments_to(
        &self,
        from: &StopId,
        candidates: &[RouteStop],
        _day: DayOfWeek,
    ) -> Result<Vec<RouteSegment>, ProviderError> {
        self.count_call()?;
        let mut segments = Vec::new();
        for candidate in candidates {
            let Some(route) = self.routes.iter().find(|r| r.key == candidate.key) else {
                continue;
            };
            let (Some(i), Some(j)) = (
                Self::position(route, from),
                Self::position(route, &candidate.stop),
            ) else {
                continue;
            };
            if j <= i {
                continue;
            }
            let records = route.calls[i..=j]
                .iter()
                .map(|call| self.record(call))
                .collect::<Result<Vec<_>, _>>()?;
            segments.push(RouteSegment {
                key: route.key.clone(),
                records,
            });
        }
        Ok(segments)
    }

    fn distance_to(&self, stop: &StopId, point: GeoPoint) -> Result<f64, ProviderError> {
        Ok(self.point(stop)?.distance_m(&point))
    }
}

/// One route R1 from A (by the origin) to D (by the destination).
fn direct_network() -> MockProvider {
    let mut provider = MockProvider::new();
    provider.add_stop("A", 0.0005);
    provider.add_stop("B", 0.02);
    provider.add_stop("C", 0.04);
    provider.add_stop("D", 0.06);
    provider.add_route(
        "R1",
        &[
            ("A", &[("08:10:00", "T1"), ("08:40:00", "T2")]),
            ("B", &[("08:14:00", "T1"), ("08:44:00", "T2")]),
            ("C", &[("08:18:00", "T1"), ("08:48:00", "T2")]),
            ("D", &[("08:22:00", "T1"), ("08:52:00", "T2")]),
        ],
    );
    provider
}

/// R1 from A to B, then R2 from B to X by the destination.
fn transfer_network() -> MockProvider {
    let mut provider = MockProvider::new();
    provider.add_stop("A", 0.0005);
    provider.add_stop("B", 0.03);
    provider.add_stop("X", 0.06);
    provider.add_route(
        "R1",
        &[
            ("A", &[("08:10:00", "T1")]),
            ("B", &[("08:15:00", "T1")]),
        ],
    );
    provider.add_route(
        "R2",
        &[
            ("B", &[("08:25:00", "U1")]),
            ("X", &[("08:35:00", "U1")]),
        ],
    );
    provider
}

fn request(origin_lon: f64, destination_lon: f64) -> SearchRequest {
    SearchRequest::new(pt(origin_lon), pt(destination_lon), 1, "08:00:00")
}

fn bus_routes(path: &PathResult) -> Vec<RouteId> {
    path.segments()
        .iter()
        .filter_map(|s| s.route.clone())
        .collect()
}

fn assert_no_route_reboarded(path: &PathResult) {
    let routes = bus_routes(path);
    for (i, route) in routes.iter().enumerate() {
        assert!(
            !routes[i + 1..].contains(route),
            "route {route} boarded twice in {routes:?}"
        );
    }
}

#[test]
fn direct_route_found() {
    let provider = direct_network();
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.0605)).unwrap();

    // Only one route serves the origin, so one itinerary is wanted
    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(path.bus_segment_count(), 1);
    assert_eq!(path.total_transfers(), 0);
    assert_eq!(path.total_wait_minutes(), 9);

    let segs = path.segments();
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[0].places, vec![Place::Origin, stop("A")]);
    assert_eq!(segs[1].segment_type, SegmentType::Bus);
    assert_eq!(segs[1].route, Some(RouteId::new("R1")));
    assert_eq!(
        segs[1].places,
        vec![stop("A"), stop("B"), stop("C"), stop("D")]
    );
    assert_eq!(segs[2].places, vec![stop("D"), Place::Destination]);

    assert_eq!(path.departure(), time("08:00:00"));
    assert_eq!(path.arrival(), time("08:23:00"));
}

#[test]
fn origin_at_stop_has_no_leading_walk() {
    let provider = direct_network();
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0005, 0.0605)).unwrap();

    let segs = result.paths[0].segments();
    assert_eq!(segs[0].segment_type, SegmentType::Bus);
    assert_eq!(segs[0].places.first(), Some(&stop("A")));
    assert_eq!(result.paths[0].departure(), time("08:00:00"));
}

#[test]
fn transfer_between_routes() {
    let provider = transfer_network();
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.0605)).unwrap();

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(
        bus_routes(path),
        vec![RouteId::new("R1"), RouteId::new("R2")]
    );
    assert_eq!(path.total_transfers(), 1);
    assert_eq!(path.total_wait_minutes(), 19);

    let segs = path.segments();
    assert_eq!(segs[1].places, vec![stop("A"), stop("B")]);
    assert_eq!(segs[1].wait_minutes, 9);
    assert_eq!(segs[2].places, vec![stop("B"), stop("X")]);
    assert_eq!(segs[2].wait_minutes, 10);
    assert_eq!(path.arrival(), time("08:36:00"));
}

#[test]
fn wait_budget_prunes_transfer() {
    let provider = transfer_network();
    let config = SearchConfig::default();

    let mut req = request(0.0, 0.0605);
    req.max_total_wait_mins = 15;

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&req).unwrap();

    // Running out of options is not an error
    assert!(result.paths.is_empty());
    assert!(result.states_expanded > 0);
}

#[test]
fn transfer_cap_prunes_transfer() {
    let provider = transfer_network();
    let config = SearchConfig {
        max_transfers: 0,
        ..SearchConfig::default()
    };

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.0605)).unwrap();

    assert!(result.paths.is_empty());
}

/// R1 runs A, B, C, E but no single trip does: T1 stops at B and T3 starts
/// at C. R2 bridges B to C and R3 runs E to D by the destination. With
/// `split` the C to E leg is a separate route R4 instead.
fn reboard_network(split: bool) -> MockProvider {
    let mut provider = MockProvider::new();
    provider.add_stop("A", 0.0005);
    provider.add_stop("B", 0.02);
    provider.add_stop("C", 0.04);
    provider.add_stop("E", 0.06);
    provider.add_stop("D", 0.08);

    let first: &[(&str, &[(&str, &str)])] = &[
        ("A", &[("08:10:00", "T1")]),
        ("B", &[("08:14:00", "T1")]),
    ];
    let second: &[(&str, &[(&str, &str)])] = &[
        ("C", &[("08:30:00", "T3")]),
        ("E", &[("08:34:00", "T3")]),
    ];
    if split {
        provider.add_route("R1", first);
        provider.add_route("R4", second);
    } else {
        let whole: Vec<_> = first.iter().chain(second).copied().collect();
        provider.add_route("R1", &whole);
    }

    provider.add_route(
        "R2",
        &[
            ("B", &[("08:20:00", "U1")]),
            ("C", &[("08:24:00", "U1")]),
        ],
    );
    provider.add_route(
        "R3",
        &[
            ("E", &[("08:40:00", "V1")]),
            ("D", &[("08:44:00", "V1")]),
        ],
    );
    provider
}

#[test]
fn route_never_reboarded() {
    let config = SearchConfig::default();
    let mut req = request(0.0, 0.0805);
    req.max_total_wait_mins = 60;

    // Getting back on R1 at C after leaving it at B is not allowed
    let provider = reboard_network(false);
    let planner = Planner::new(&provider, &config);
    let result = planner.search(&req).unwrap();
    assert!(result.paths.is_empty());

    // The same timetable under another route id is fine
    let provider = reboard_network(true);
    let planner = Planner::new(&provider, &config);
    let result = planner.search(&req).unwrap();
    assert!(!result.paths.is_empty());
    for path in &result.paths {
        assert_no_route_reboarded(path);
        assert!(path.total_transfers() <= config.max_transfers);
        assert!(i64::from(path.total_wait_minutes()) <= req.max_total_wait_mins);
    }
}

#[test]
fn all_walking_when_no_stop_is_closer() {
    // The only stop is behind the origin, farther from the destination
    let mut provider = MockProvider::new();
    provider.add_stop("S", -0.005);
    provider.add_route("R1", &[("S", &[("08:10:00", "T1")])]);
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.005)).unwrap();

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(path.segments().len(), 1);
    assert!(path.is_walk_only());
    assert_eq!(
        path.segments()[0].places,
        vec![Place::Origin, Place::Destination]
    );
    assert_eq!(path.total_wait_minutes(), 0);
    assert_eq!(path.total_transfers(), 0);
    // ~556 m at 5 km/h
    assert_eq!(path.total_walk_minutes(), 7);
    assert_eq!(result.states_expanded, 0);
}

#[test]
fn shortcut_may_exceed_max_paths() {
    // Two routes leave A for stops by the destination, which is close enough
    // for the first state to be finished off at once.
    let mut provider = MockProvider::new();
    provider.add_stop("A", 0.0005);
    provider.add_stop("D1", 0.02);
    provider.add_stop("D2", 0.0201);
    provider.add_route(
        "R1",
        &[
            ("A", &[("08:10:00", "W1")]),
            ("D1", &[("08:14:00", "W1")]),
        ],
    );
    provider.add_route(
        "R2",
        &[
            ("A", &[("08:12:00", "X1")]),
            ("D2", &[("08:16:00", "X1")]),
        ],
    );
    let config = SearchConfig::default();

    let mut req = request(0.0, 0.021);
    req.max_paths = 1;

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&req).unwrap();

    // Stops once the total found reaches max_paths, which one pop overshot
    assert_eq!(result.paths.len(), 2);
    assert_eq!(result.states_expanded, 1);
    for path in &result.paths {
        assert_eq!(path.bus_segment_count(), 1);
        assert_eq!(path.total_transfers(), 0);
    }
}

#[test]
fn walking_link_used_to_reach_route() {
    // The origin is near W, which has no buses; a walking link leads to A
    let mut provider = direct_network();
    provider.add_stop("W", -0.0095);
    provider.add_route("R9", &[("W", &[("07:00:00", "Z1")])]);
    provider.add_walk("W", "A", 300.0);
    // Take A out of range of the origin
    provider.stops.insert(StopId::new("A"), pt(0.002));
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(-0.01, 0.0605)).unwrap();

    assert!(!result.paths.is_empty());
    let path = &result.paths[0];
    assert_eq!(bus_routes(path), vec![RouteId::new("R1")]);
    let segs = path.segments();
    assert_eq!(segs[0].places, vec![Place::Origin, stop("W"), stop("A")]);
    assert!(path.total_walk_minutes() <= 20);
}

#[test]
fn origin_walk_seeded_regardless_of_walk_budget() {
    let provider = direct_network();
    let config = SearchConfig::default();

    // A is 55 m from the origin, a one minute walk
    let mut req = request(0.0, 0.0605);
    req.max_total_walk_mins = 0;

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&req).unwrap();

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(bus_routes(path), vec![RouteId::new("R1")]);
    assert_eq!(path.segments()[0].places, vec![Place::Origin, stop("A")]);
    assert_eq!(path.arrival(), time("08:23:00"));
}

/// A and W as in `walking_link_used_to_reach_route`, plus R5 running from W
/// straight to D, later than R1 gets there.
fn walk_or_ride_network() -> MockProvider {
    let mut provider = direct_network();
    provider.add_stop("W", -0.0095);
    provider.add_route(
        "R5",
        &[
            ("W", &[("08:15:00", "Y1")]),
            ("D", &[("08:35:00", "Y1")]),
        ],
    );
    provider.add_walk("W", "A", 300.0);
    provider.stops.insert(StopId::new("A"), pt(0.002));
    provider
}

#[test]
fn walk_budget_prunes_walking_link() {
    let provider = walk_or_ride_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&provider, &config);

    // With room to walk, the link to A and R1 is quicker
    let result = planner.search(&request(-0.01, 0.0605)).unwrap();
    assert_eq!(bus_routes(&result.paths[0]), vec![RouteId::new("R1")]);
    assert_eq!(
        result.paths[0].segments()[0].places,
        vec![Place::Origin, stop("W"), stop("A")]
    );

    // One minute to W plus four along the link is over budget
    let mut req = request(-0.01, 0.0605);
    req.max_total_walk_mins = 3;
    let result = planner.search(&req).unwrap();

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert_eq!(bus_routes(path), vec![RouteId::new("R5")]);
    assert!(
        path.segments()
            .iter()
            .all(|s| !s.places.contains(&stop("A"))),
        "{path:?}"
    );
    assert_eq!(path.arrival(), time("08:36:00"));
}

#[test]
fn destination_stop_served_twice_gives_one_itinerary() {
    // A is the stop nearest the destination on both routes, whose other
    // stops lie behind the origin
    let mut provider = MockProvider::new();
    provider.add_stop("A", 0.0005);
    provider.add_stop("B", -0.01);
    provider.add_stop("C", -0.02);
    provider.add_route(
        "R1",
        &[
            ("A", &[("08:10:00", "T1")]),
            ("B", &[("08:14:00", "T1")]),
        ],
    );
    provider.add_route(
        "R2",
        &[
            ("A", &[("08:12:00", "U1")]),
            ("C", &[("08:20:00", "U1")]),
        ],
    );
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.003)).unwrap();

    assert_eq!(result.paths.len(), 1);
    let path = &result.paths[0];
    assert!(path.is_walk_only());
    assert_eq!(
        path.segments()[0].places,
        vec![Place::Origin, stop("A"), Place::Destination]
    );
}

#[test]
fn states_along_each_itinerary_are_chronological() {
    let mut req = request(0.0, 0.0805);
    req.max_total_wait_mins = 60;
    let cases = [
        (direct_network(), request(0.0, 0.0605)),
        (transfer_network(), request(0.0, 0.0605)),
        (reboard_network(true), req),
    ];
    let config = SearchConfig::default();

    for (provider, req) in &cases {
        let planner = Planner::new(provider, &config);
        let explored = planner.explore(req).unwrap();
        assert!(!explored.leaves.is_empty());

        for &leaf in &explored.leaves {
            let times: Vec<ClockTime> = explored.arena.chain(leaf).map(|s| s.time).collect();
            // Newest first
            for pair in times.windows(2) {
                assert!(pair[0] >= pair[1], "{times:?}");
            }
        }
    }

    let provider = reboard_network(true);
    let result = Planner::new(&provider, &config).search(&cases[2].1).unwrap();
    let path = &result.paths[0];
    assert!(path.total_transfers() >= 2);
    assert!(path.departure() <= path.arrival());
}

#[test]
fn invalid_day_rejected_before_search() {
    let provider = direct_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&provider, &config);

    for day in [0, 8] {
        let mut req = request(0.0, 0.0605);
        req.day_of_week = day;
        let result = planner.search(&req);
        assert!(
            matches!(result, Err(SearchError::InvalidParameter(_))),
            "day {day}"
        );
    }
    assert_eq!(provider.api_call_count(), 0);
}

#[test]
fn invalid_speed_rejected_before_search() {
    let provider = direct_network();
    let config = SearchConfig::default();
    let planner = Planner::new(&provider, &config);

    let mut req = request(0.0, 0.0605);
    req.bus_speed_kmh = 100.0;

    assert!(matches!(
        planner.search(&req),
        Err(SearchError::InvalidParameter(_))
    ));
    assert_eq!(provider.api_call_count(), 0);
}

#[test]
fn mismatched_timetable_is_integrity_error() {
    let mut provider = direct_network();
    provider.routes[0].calls[1].trip_ids.push("T9".to_string());
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.0605));

    match result {
        Err(SearchError::DataIntegrity(message)) => assert!(message.contains('B'), "{message}"),
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[test]
fn no_stops_near_origin() {
    let provider = direct_network();
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(-0.5, 0.0605));

    assert!(matches!(
        result,
        Err(SearchError::NoStopsNearEndpoint(Endpoint::Origin))
    ));
}

#[test]
fn no_stops_near_destination() {
    let provider = direct_network();
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.5));

    assert!(matches!(
        result,
        Err(SearchError::NoStopsNearEndpoint(Endpoint::Destination))
    ));
}

#[test]
fn provider_failure_propagates() {
    let mut provider = direct_network();
    provider.backend_down = true;
    let config = SearchConfig::default();

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.0605));

    assert!(matches!(
        result,
        Err(SearchError::Provider(ProviderError::Backend(_)))
    ));
}

#[test]
fn expansion_cap_without_results_times_out() {
    let provider = direct_network();
    let config = SearchConfig {
        max_expansions: 0,
        ..SearchConfig::default()
    };

    let planner = Planner::new(&provider, &config);
    let result = planner.search(&request(0.0, 0.0605));

    assert!(matches!(result, Err(SearchError::Timeout)));
}

#[test]
fn concurrent_searches_are_independent() {
    let provider = direct_network();
    let config = SearchConfig::default();

    let (slow, fast) = std::thread::scope(|scope| {
        let slow = scope.spawn(|| {
            let mut req = request(0.0, 0.0605);
            req.walk_speed_kmh = 2.0;
            Planner::new(&provider, &config).search(&req)
        });
        let fast = scope.spawn(|| Planner::new(&provider, &config).search(&request(0.0, 0.0605)));
        (slow.join().unwrap(), fast.join().unwrap())
    });

    let slow = slow.unwrap();
    let fast = fast.unwrap();
    // ~55 m takes 2 minutes at 2 km/h and 1 minute at 5 km/h
    assert_eq!(slow.paths[0].segments()[0].places[0], Place::Origin);
    assert_eq!(fast.paths[0].total_walk_minutes(), 2);
    assert_eq!(slow.paths[0].total_walk_minutes(), 4);
}
