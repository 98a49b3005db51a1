//! Application use cases

mod matching_service;

pub use matching_service::{
    advance_load, approve_vehicle, assign, find_loads, match_all_posted, match_one,
    release_vehicle, AssignmentResult, MatchOptions, MatchSummary,
};
