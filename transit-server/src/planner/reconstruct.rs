//! Turning a terminal search state into an itinerary.

use crate::domain::{PathResult, PathSegment, Place, SegmentType};

use super::state::{Mode, StateArena, StateId};

/// Build the itinerary ending at `leaf`.
///
/// The parent chain is walked newest first and consecutive states reached by
/// the same mode are grouped into one segment. A boundary stop belongs to
/// both segments it joins. The wait on each edge is charged to the segment
/// of the state it leads to, i.e. to the vehicle that was waited for.
pub fn reconstruct(arena: &StateArena, leaf: StateId) -> PathResult {
    let leaf_state = arena.get(leaf);

    let mut segments = Vec::new();
    let mut places: Vec<Place> = Vec::new();
    let mut mode: Option<&Mode> = None;
    let mut wait = 0u32;
    let mut child_wait: Option<u32> = None;
    let mut departure = leaf_state.time;

    for state in arena.chain(leaf) {
        if let Some(child_wait) = child_wait {
            wait += child_wait.abs_diff(state.wait_mins);
        }
        child_wait = Some(state.wait_mins);
        departure = state.time;

        if mode != Some(&state.mode) {
            if let Some(closing) = mode {
                places.push(state.place.clone());
                segments.push(segment(std::mem::take(&mut places), closing, wait));
                wait = 0;
            }
            mode = Some(&state.mode);
        }
        places.push(state.place.clone());
    }

    // A seed that starts directly at a stop leaves a one-place segment behind
    if let Some(mode) = mode {
        if places.len() > 1 || segments.is_empty() {
            segments.push(segment(places, mode, wait));
        }
    }

    segments.reverse();

    PathResult::new(
        segments,
        leaf_state.transfers,
        leaf_state.wait_mins,
        leaf_state.walk_mins,
        departure,
        leaf_state.time,
    )
}

/// Close a segment collected newest first.
fn segment(mut places: Vec<Place>, mode: &Mode, wait_minutes: u32) -> PathSegment {
    places.reverse();
    match mode {
        Mode::Walk => PathSegment {
            places,
            route: None,
            direction: None,
            segment_type: SegmentType::Walk,
            wait_minutes,
        },
        Mode::Bus(key) => PathSegment {
            places,
            route: Some(key.route.clone()),
            direction: Some(key.direction),
            segment_type: SegmentType::Bus,
            wait_minutes,
        },
    }
}
