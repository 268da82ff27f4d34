//! Application state for the web layer.

use std::sync::Arc;

use crate::graph::TransitGraph;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Both parts are immutable once the server starts, so searches share them
/// without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded transit network
    pub graph: Arc<TransitGraph>,

    /// Path planner configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: TransitGraph, config: SearchConfig) -> Self {
        Self {
            graph: Arc::new(graph),
            config: Arc::new(config),
        }
    }
}
