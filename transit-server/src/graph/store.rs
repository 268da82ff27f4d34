//! In-memory transit graph answering the planner's lookups.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::Weekday;
use tracing::debug;

use crate::domain::{DayOfWeek, DomainError, GeoPoint, RouteKey, StopId, Timetable};
use crate::planner::{
    Edge, GraphDataProvider, NearbyStop, ProviderError, RouteSegment, RouteStop, StopRecord,
};
use crate::walkable::WalkingLinks;

use super::error::GraphError;
use super::file::GraphFile;

/// Timetable columns as stored. They are checked each time they are read,
/// so a bad column fails the search that touches it rather than the load.
#[derive(Debug, Clone)]
struct RawTimetable {
    arrival_times: Vec<String>,
    trip_ids: Vec<String>,
}

#[derive(Debug, Clone)]
struct Route {
    key: RouteKey,
    stops: Vec<StopId>,
    timetables: HashMap<(Weekday, StopId), RawTimetable>,
}

impl Route {
    /// First call at `stop` at or after `from`.
    fn position(&self, stop: &StopId, from: usize) -> Option<usize> {
        self.stops
            .iter()
            .skip(from)
            .position(|s| s == stop)
            .map(|i| i + from)
    }
}

/// A transit network held in memory.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    stops: HashMap<StopId, GeoPoint>,
    routes: Vec<Route>,

    /// Calls at each stop as (route index, position on route).
    calls: HashMap<StopId, Vec<(usize, usize)>>,

    walks: WalkingLinks,
}

impl TransitGraph {
    /// Load a graph from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load a graph from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_str(json)?;
        Self::from_document(file)
    }

    /// Build a graph from a parsed document, checking its references.
    pub fn from_document(file: GraphFile) -> Result<Self, GraphError> {
        let mut graph = TransitGraph::default();

        for stop in file.stops {
            let id = StopId::new(stop.id);
            if graph
                .stops
                .insert(id.clone(), GeoPoint::new(stop.lat, stop.lon))
                .is_some()
            {
                return Err(GraphError::DuplicateStop(id));
            }
        }

        for entry in file.routes {
            let key = RouteKey {
                route: entry.route_id.into(),
                direction: entry.direction_id,
            };
            if graph.routes.iter().any(|r| r.key == key) {
                return Err(GraphError::DuplicateRoute(key));
            }

            let stops: Vec<StopId> = entry.stops.into_iter().map(StopId::new).collect();
            for stop in &stops {
                graph.require_stop(stop, || format!("route {key}"))?;
            }

            let mut timetables = HashMap::new();
            for columns in entry.timetables {
                let day: Weekday = columns.day.parse().map_err(|_| GraphError::InvalidDay {
                    route: key.clone(),
                    day: columns.day.clone(),
                })?;
                let stop = StopId::new(columns.stop);
                if !stops.contains(&stop) {
                    return Err(GraphError::StrayTimetable {
                        route: key.clone(),
                        stop,
                    });
                }
                timetables.insert(
                    (day, stop),
                    RawTimetable {
                        arrival_times: columns.arrival_times,
                        trip_ids: columns.trip_ids,
                    },
                );
            }

            let index = graph.routes.len();
            for (position, stop) in stops.iter().enumerate() {
                graph
                    .calls
                    .entry(stop.clone())
                    .or_default()
                    .push((index, position));
            }
            graph.routes.push(Route {
                key,
                stops,
                timetables,
            });
        }

        for walk in file.walks {
            let from = StopId::new(walk.from);
            let to = StopId::new(walk.to);
            let a = graph.require_stop(&from, || "walk".to_string())?;
            let b = graph.require_stop(&to, || "walk".to_string())?;
            let distance_m = walk.distance_m.unwrap_or_else(|| a.distance_m(&b));
            graph.walks.add(from, to, distance_m);
        }

        debug!(
            stops = graph.stops.len(),
            routes = graph.routes.len(),
            walks = graph.walks.len(),
            "Loaded transit graph"
        );

        Ok(graph)
    }

    fn require_stop(
        &self,
        stop: &StopId,
        context: impl FnOnce() -> String,
    ) -> Result<GeoPoint, GraphError> {
        self.stops
            .get(stop)
            .copied()
            .ok_or_else(|| GraphError::UnknownStop {
                context: context(),
                stop: stop.clone(),
            })
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn walk_count(&self) -> usize {
        self.walks.len()
    }

    /// Check every stored timetable, returning the problems found.
    pub fn check_timetables(&self) -> Vec<DomainError> {
        self.routes
            .iter()
            .flat_map(|route| route.timetables.iter())
            .filter_map(|((_, stop), raw)| {
                Timetable::from_columns(stop, &raw.arrival_times, &raw.trip_ids).err()
            })
            .collect()
    }

    fn point(&self, stop: &StopId) -> Result<GeoPoint, ProviderError> {
        self.stops
            .get(stop)
            .copied()
            .ok_or_else(|| ProviderError::UnknownStop(stop.clone()))
    }

    /// The timetable of `route` at `stop` on `day`, if it runs there that day.
    fn timetable(
        &self,
        route: &Route,
        stop: &StopId,
        day: Weekday,
    ) -> Result<Option<Timetable>, ProviderError> {
        match route.timetables.get(&(day, stop.clone())) {
            Some(raw) => Ok(Some(Timetable::from_columns(
                stop,
                &raw.arrival_times,
                &raw.trip_ids,
            )?)),
            None => Ok(None),
        }
    }

    /// Records for the calls in `range`, or `None` if any of them has no
    /// timetable on `day`.
    fn records(
        &self,
        route: &Route,
        range: RangeInclusive<usize>,
        day: Weekday,
    ) -> Result<Option<Vec<StopRecord>>, ProviderError> {
        let mut records = Vec::new();
        for stop in &route.stops[range] {
            let Some(timetable) = self.timetable(route, stop, day)? else {
                return Ok(None);
            };
            records.push(StopRecord {
                stop: stop.clone(),
                point: self.point(stop)?,
                timetable,
            });
        }
        Ok(Some(records))
    }

    fn route(&self, key: &RouteKey) -> Option<&Route> {
        self.routes.iter().find(|r| &r.key == key)
    }
}

impl GraphDataProvider for TransitGraph {
    fn nearest_stops_per_route(
        &self,
        point: GeoPoint,
        radius_m: f64,
    ) -> Result<BTreeMap<RouteKey, NearbyStop>, ProviderError> {
        let mut nearest = BTreeMap::new();

        for route in &self.routes {
            let mut best: Option<NearbyStop> = None;
            for stop in &route.stops {
                let distance_m = self.point(stop)?.distance_m(&point);
                if distance_m > radius_m {
                    continue;
                }
                if best.as_ref().is_none_or(|b| distance_m < b.distance_m) {
                    best = Some(NearbyStop {
                        stop: stop.clone(),
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

    fn neighbors(&self, stop: &StopId, day: DayOfWeek) -> Result<Vec<Edge>, ProviderError> {
        let day = day.weekday();
        let mut edges = Vec::new();

        for &(index, position) in self.calls.get(stop).map(Vec::as_slice).unwrap_or_default() {
            let route = &self.routes[index];
            let Some(next) = route.stops.get(position + 1) else {
                continue;
            };
            let (Some(departures), Some(arrivals)) = (
                self.timetable(route, stop, day)?,
                self.timetable(route, next, day)?,
            ) else {
                continue;
            };
            edges.push(Edge::Scheduled {
                to: next.clone(),
                key: route.key.clone(),
                departures,
                arrivals,
            });
        }

        for link in self.walks.walkable_from(stop) {
            edges.push(Edge::Walk {
                to: link.to.clone(),
                distance_m: link.distance_m,
            });
        }

        Ok(edges)
    }

    fn route_segment_toward(
        &self,
        from: &StopId,
        key: &RouteKey,
        day: DayOfWeek,
        destination: GeoPoint,
    ) -> Result<Vec<StopRecord>, ProviderError> {
        let Some(route) = self.route(key) else {
            return Ok(Vec::new());
        };
        let Some(start) = route.position(from, 0) else {
            return Ok(Vec::new());
        };

        let mut closest = start;
        let mut closest_m = f64::INFINITY;
        for (position, stop) in route.stops.iter().enumerate().skip(start) {
            let distance_m = self.point(stop)?.distance_m(&destination);
            if distance_m < closest_m {
                closest = position;
                closest_m = distance_m;
            }
        }

        Ok(self
            .records(route, start..=closest, day.weekday())?
            .unwrap_or_default())
    }

    fn route_segments_to(
        &self,
        from: &StopId,
        candidates: &[RouteStop],
        day: DayOfWeek,
    ) -> Result<Vec<RouteSegment>, ProviderError> {
        let mut segments = Vec::new();

        for candidate in candidates {
            let Some(route) = self.route(&candidate.key) else {
                continue;
            };
            let Some(start) = route.position(from, 0) else {
                continue;
            };
            let Some(end) = route.position(&candidate.stop, start + 1) else {
                continue;
            };
            if let Some(records) = self.records(route, start..=end, day.weekday())? {
                segments.push(RouteSegment {
                    key: route.key.clone(),
                    records,
                });
            }
        }

        Ok(segments)
    }

    fn distance_to(&self, stop: &StopId, point: GeoPoint) -> Result<f64, ProviderError> {
        Ok(self.point(stop)?.distance_m(&point))
    }
}
