//! Score, distance and speed escalation
//!
//! Score and distance are recomputed from scratch every tick from the
//! session start time, the current speed and the run counters.

use super::state::RunStats;
use crate::consts::*;

/// Points per avoided obstacle or collected power-up
pub const BUG_POINTS: u64 = 10;
pub const DEADLINE_POINTS: u64 = 15;
pub const MEETING_POINTS: u64 = 20;
pub const COFFEE_POINTS: u64 = 25;
pub const WEEKEND_POINTS: u64 = 30;

/// Distance covered after `elapsed_ms` at `speed`
pub fn distance_for(elapsed_ms: f64, speed: f32) -> u64 {
    let elapsed_secs = (elapsed_ms / 1000.0).max(0.0);
    let distance = (elapsed_secs * speed as f64 * DISTANCE_SCALE).floor();
    if distance.is_finite() { distance as u64 } else { 0 }
}

/// Total score for a distance plus the weighted counters
pub fn score_for(distance: u64, stats: &RunStats) -> u64 {
    distance
        + stats.bugs_avoided as u64 * BUG_POINTS
        + stats.deadlines_avoided as u64 * DEADLINE_POINTS
        + stats.meetings_avoided as u64 * MEETING_POINTS
        + stats.coffee_collected as u64 * COFFEE_POINTS
        + stats.weekends_collected as u64 * WEEKEND_POINTS
}

/// One escalation step. Never lowers the speed: a coffee boost above the
/// escalation cap is kept as is.
pub fn escalate_speed(speed: f32) -> f32 {
    if speed >= ESCALATION_CAP {
        speed
    } else {
        (speed + SPEED_STEP).min(ESCALATION_CAP)
    }
}

/// Speed after a coffee pickup
pub fn boosted_speed(speed: f32) -> f32 {
    (speed * SPEED_BOOST_FACTOR).min(MAX_SPEED)
}

/// Guard against speed drifting outside (0, MAX_SPEED]
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed > 0.0 {
        speed.min(MAX_SPEED)
    } else {
        INITIAL_SPEED
    }
}
