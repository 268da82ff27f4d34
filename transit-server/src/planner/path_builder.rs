//! Riding a known route segment through its timetables.
//!
//! Once the search knows which stops a route will carry the rider through,
//! the builder resolves the actual trip and arrival time at each stop and
//! finishes the itinerary on foot. If the timetable runs out part way, the
//! rider gets off at the last stop reached and walks from there.

use chrono::Duration;
use tracing::trace;

use crate::domain::{GeoPoint, Place, RouteKey, StopId, Timetable, travel_minutes};

use super::config::{SearchConfig, SearchParams};
use super::provider::StopRecord;
use super::registry::{ArrivalRegistry, BestArrival};
use super::state::{Hop, Mode, SearchState, StateArena, StateId};

/// How strictly a segment's waits are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Waits limited by the single-wait cap and the remaining wait budget.
    Constrained,

    /// Waits unbounded: the rider takes whatever the timetable offers.
    Unconstrained,
}

/// Builds terminal states for the current search.
pub struct PathBuilder<'s> {
    pub arena: &'s mut StateArena,
    pub registry: &'s mut ArrivalRegistry,
    pub config: &'s SearchConfig,
    pub params: &'s SearchParams,
    pub destination: GeoPoint,
}

impl PathBuilder<'_> {
    /// Ride `key` through `records` from `start`, then walk to the destination.
    ///
    /// `records[0]` is the stop `start` is at. Returns the destination state,
    /// or `None` when the final walk would exceed the single-walk cap.
    pub fn ride(
        &mut self,
        start: StateId,
        key: &RouteKey,
        records: &[StopRecord],
        budget: Budget,
    ) -> Option<StateId> {
        let first = records.first()?;
        let mut current = start;
        let mut last_point = first.point;

        for pair in records.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);

            let Some(hop) = self.board(current, key, prev, next, budget) else {
                trace!(stop = %prev.stop, route = %key, "timetable ran out, walking");
                return self.walk_to_destination(current, prev.point);
            };

            let time = hop.time;
            let cost = self.arena.get(current).cost + hop.cost;
            current = self.arena.extend(current, hop);
            self.registry.record(
                &next.stop,
                BestArrival {
                    state: current,
                    time,
                    cost,
                },
            );
            last_point = next.point;
        }

        self.walk_to_destination(current, last_point)
    }

    /// Walk from `from`, standing at `point`, to the destination.
    ///
    /// Fails when the walk is longer than the single-walk cap.
    pub fn walk_to_destination(&mut self, from: StateId, point: GeoPoint) -> Option<StateId> {
        let minutes = travel_minutes(
            point.distance_m(&self.destination),
            self.params.walk_speed_kmh,
        );
        if minutes > self.config.max_walk_leg_mins as f64 {
            return None;
        }
        Some(self.finish_on_foot(from, minutes))
    }

    /// Append a walk of `minutes` (rounded up) ending at the destination.
    pub fn finish_on_foot(&mut self, from: StateId, minutes: f64) -> StateId {
        let walk_mins = minutes.max(0.0).ceil() as u32;
        let time = self.arena.get(from).time + Duration::minutes(i64::from(walk_mins));

        self.arena.extend(
            from,
            Hop {
                place: Place::Destination,
                mode: Mode::Walk,
                trip: None,
                time,
                wait_mins: 0,
                walk_mins,
                cost: f64::from(walk_mins),
                heuristic: 0.0,
            },
        )
    }

    /// Resolve the ride from `prev` to `next` for the rider at `from`.
    fn board(
        &self,
        from: StateId,
        key: &RouteKey,
        prev: &StopRecord,
        next: &StopRecord,
        budget: Budget,
    ) -> Option<Hop> {
        let state = self.arena.get(from);

        let max_wait = match budget {
            Budget::Constrained => {
                let remaining =
                    (self.params.max_total_wait_mins - i64::from(state.wait_mins)).max(0);
                Some(Duration::minutes(
                    self.params.max_single_wait_mins.min(remaining),
                ))
            }
            Budget::Unconstrained => None,
        };

        let hop = board(
            state,
            key,
            &next.stop,
            &prev.timetable,
            &next.timetable,
            max_wait,
            self.config.transfer_buffer(),
        )?;

        // Changing trips part way along counts against the transfer cap too
        if self.arena.is_transfer(from, hop.wait_mins)
            && state.transfers >= self.config.max_transfers
        {
            return None;
        }
        Some(hop)
    }
}

/// The bus hop from the stop `state` is at to `to` on `key`.
///
/// Staying on the current trip is preferred when it reaches `to` no earlier
/// than now. Otherwise the earliest trip in `departures` that also calls at
/// `to` is boarded, no sooner than `buffer` and no later than `max_wait`
/// from now.
pub fn board(
    state: &SearchState,
    key: &RouteKey,
    to: &StopId,
    departures: &Timetable,
    arrivals: &Timetable,
    max_wait: Option<Duration>,
    buffer: Duration,
) -> Option<Hop> {
    let now = state.time;

    if let Some(trip) = &state.trip {
        if let Some(arrival) = arrivals.match_by_trip(trip) {
            if arrival >= now {
                return Some(Hop {
                    place: Place::Stop(to.clone()),
                    mode: Mode::Bus(key.clone()),
                    trip: Some(trip.clone()),
                    time: arrival,
                    wait_mins: 0,
                    walk_mins: 0,
                    cost: arrival.minutes_since(now),
                    heuristic: 0.0,
                });
            }
        }
    }

    let boarding = departures.closest_arrival_where(now, max_wait, buffer, |e| {
        arrivals.serves_trip(&e.trip)
    })?;
    let arrival = arrivals.match_by_trip(&boarding.trip)?;
    if arrival < boarding.arrival {
        return None;
    }

    let wait = boarding.arrival.minutes_since(now);
    Some(Hop {
        place: Place::Stop(to.clone()),
        mode: Mode::Bus(key.clone()),
        trip: Some(boarding.trip.clone()),
        time: arrival,
        wait_mins: wait.ceil() as u32,
        walk_mins: 0,
        // Waiting is charged on top of the elapsed time
        cost: wait + arrival.minutes_since(now),
        heuristic: 0.0,
    })
}
