//! Search states and the arena that owns them.
//!
//! Every state records how it was reached through a parent index, so the
//! arena is both the search tree and the store of candidate itineraries.
//! Parents are always pushed before their children, which keeps every chain
//! finite and acyclic.

use std::ops::Index;

use crate::domain::{ClockTime, Place, RouteId, RouteKey, TripId};

/// How a state was reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Walk,
    Bus(RouteKey),
}

impl Mode {
    pub fn route_key(&self) -> Option<&RouteKey> {
        match self {
            Mode::Walk => None,
            Mode::Bus(key) => Some(key),
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, Mode::Walk)
    }
}

/// Handle to a state in a [`StateArena`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

/// "At this place, reached this way, at this time, having spent this much."
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub place: Place,
    pub mode: Mode,

    /// Trip being ridden; `None` while walking or before boarding.
    pub trip: Option<TripId>,

    pub parent: Option<StateId>,

    /// Cost so far (minutes).
    pub cost: f64,

    /// Cost so far plus the heuristic remainder (minutes).
    pub estimate: f64,

    pub time: ClockTime,
    pub transfers: u32,
    pub wait_mins: u32,
    pub walk_mins: u32,
}

impl SearchState {
    /// A state with no predecessor.
    pub fn root(place: Place, time: ClockTime) -> Self {
        Self {
            place,
            mode: Mode::Walk,
            trip: None,
            parent: None,
            cost: 0.0,
            estimate: 0.0,
            time,
            transfers: 0,
            wait_mins: 0,
            walk_mins: 0,
        }
    }
}

/// One move from an existing state to a new one.
#[derive(Debug, Clone)]
pub struct Hop {
    pub place: Place,
    pub mode: Mode,
    pub trip: Option<TripId>,
    pub time: ClockTime,

    /// Minutes waited before this move.
    pub wait_mins: u32,

    /// Minutes walked during this move.
    pub walk_mins: u32,

    /// Cost added by this move (minutes).
    pub cost: f64,

    /// Heuristic remainder at the new place (minutes).
    pub heuristic: f64,
}

/// Owner of every state created during one search.
#[derive(Debug, Default)]
pub struct StateArena {
    states: Vec<SearchState>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a state, returning its handle.
    pub fn push(&mut self, state: SearchState) -> StateId {
        debug_assert!(state.parent.is_none_or(|p| p.0 < self.states.len()));
        debug_assert!(state.estimate >= state.cost);
        self.states.push(state);
        StateId(self.states.len() - 1)
    }

    /// Whether waiting `wait_mins` before boarding from `from` is a transfer.
    ///
    /// Waiting only counts once the rider has already been on a bus; the
    /// first boarding of an itinerary is free. A transfer is a change of
    /// vehicle, so a wait after walking from the origin to a stop is not one.
    pub fn is_transfer(&self, from: StateId, wait_mins: u32) -> bool {
        wait_mins > 0 && self.has_ridden(from)
    }

    /// Create the state reached from `from` by `hop`.
    pub fn extend(&mut self, from: StateId, hop: Hop) -> StateId {
        let transfer = hop.mode.route_key().is_some() && self.is_transfer(from, hop.wait_mins);
        let parent = &self.states[from.0];
        let cost = parent.cost + hop.cost;

        let state = SearchState {
            place: hop.place,
            mode: hop.mode,
            trip: hop.trip,
            parent: Some(from),
            cost,
            estimate: cost + hop.heuristic.max(0.0),
            time: hop.time,
            transfers: parent.transfers + u32::from(transfer),
            wait_mins: parent.wait_mins + hop.wait_mins,
            walk_mins: parent.walk_mins + hop.walk_mins,
        };
        self.push(state)
    }

    pub fn get(&self, id: StateId) -> &SearchState {
        &self.states[id.0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state and its predecessors, newest first.
    pub fn chain(&self, id: StateId) -> impl Iterator<Item = &SearchState> + '_ {
        std::iter::successors(Some(self.get(id)), |s| s.parent.map(|p| self.get(p)))
    }

    /// Whether any state in the chain was reached by bus.
    pub fn has_ridden(&self, id: StateId) -> bool {
        self.chain(id).any(|s| !s.mode.is_walk())
    }

    /// Whether `route` (in either direction) was ridden anywhere in the chain.
    pub fn has_ridden_route(&self, id: StateId, route: &RouteId) -> bool {
        self.chain(id)
            .any(|s| s.mode.route_key().is_some_and(|k| &k.route == route))
    }
}

impl Index<StateId> for StateArena {
    type Output = SearchState;

    fn index(&self, id: StateId) -> &Self::Output {
        self.get(id)
    }
}
