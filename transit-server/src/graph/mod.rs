//! Transit graph storage.
//!
//! The graph is loaded once from a JSON document and shared read-only
//! between searches.

mod error;
mod file;
mod store;

pub use error::GraphError;
pub use file::{GraphFile, RouteEntry, StopEntry, TimetableEntryColumns, WalkEntry};
pub use store::TransitGraph;
