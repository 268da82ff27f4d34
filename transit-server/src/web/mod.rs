//! Web layer for the transit path planner.
//!
//! Provides HTTP endpoints for planning paths over the loaded graph.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
