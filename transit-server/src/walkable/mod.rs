//! Walking links between stops.
//!
//! Some stops are close enough to walk between, enabling connections that
//! don't appear in any route (e.g. opposite sides of an interchange).
//! This module provides lookup for walkable stop pairs and their distances.

use std::collections::HashMap;

use crate::domain::StopId;

/// A stop reachable on foot and how far away it is.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkLink {
    pub to: StopId,
    pub distance_m: f64,
}

/// A collection of walking links between stops.
///
/// Links are symmetric: if you can walk from A to B, you can walk from B to A
/// over the same distance.
#[derive(Debug, Clone, Default)]
pub struct WalkingLinks {
    /// Links leaving each stop, in the order they were added.
    links: HashMap<StopId, Vec<WalkLink>>,
    pairs: usize,
}

impl WalkingLinks {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a walking link between two stops.
    ///
    /// The link is stored symmetrically. Adding a pair again replaces its
    /// distance.
    pub fn add(&mut self, a: StopId, b: StopId, distance_m: f64) {
        let fresh = self.insert(&a, &b, distance_m);
        if a != b {
            self.insert(&b, &a, distance_m);
        }
        if fresh {
            self.pairs += 1;
        }
    }

    fn insert(&mut self, from: &StopId, to: &StopId, distance_m: f64) -> bool {
        let out = self.links.entry(from.clone()).or_default();
        match out.iter_mut().find(|l| &l.to == to) {
            Some(link) => {
                link.distance_m = distance_m;
                false
            }
            None => {
                out.push(WalkLink {
                    to: to.clone(),
                    distance_m,
                });
                true
            }
        }
    }

    /// All stops walkable from a given stop.
    pub fn walkable_from(&self, from: &StopId) -> &[WalkLink] {
        self.links.get(from).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the number of linked pairs (counting A→B and B→A as one).
    pub fn len(&self) -> usize {
        self.pairs
    }

    /// Returns true if there are no walking links.
    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}
