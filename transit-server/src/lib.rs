//! Transit path planner server.
//!
//! A web application that answers: "Leaving from here at this time, which
//! buses and walks get me there?"

pub mod domain;
pub mod graph;
pub mod planner;
pub mod walkable;
pub mod web;
