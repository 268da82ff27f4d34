//! Itinerary planner using time-dependent A* search.
//!
//! This module answers: "I'm here at this time, how do I get there by bus
//! and on foot?"
//!
//! States live in an arena and link to their predecessor, so every candidate
//! itinerary can be rebuilt from its last state. Everything a search mutates
//! is created per request; only [`SearchConfig`] and the data provider are
//! shared.

mod config;
mod path_builder;
mod provider;
mod reconstruct;
mod registry;
mod search;
mod state;

#[cfg(test)]
mod search_tests;

pub use config::{SearchConfig, SearchParams};
pub use provider::{
    Edge, GraphDataProvider, NearbyStop, ProviderError, RouteSegment, RouteStop, StopRecord,
};
pub use search::{Endpoint, Planner, SearchError, SearchRequest, SearchResult};
