//! Demo mode controller
//!
//! Looks at the nearest obstacle still ahead of the player and decides
//! whether to jump or duck. Power-ups are grabbed simply by running
//! upright whenever nothing is threatening.

use super::state::{GameState, Obstacle, ObstacleTier};

/// How far ahead (pixels past the player's front edge) the pilot reacts
const REACTION_DISTANCE: f32 = 90.0;
/// Jumps are timed later at low speeds
const JUMP_LEAD_TICKS: f32 = 8.0;

/// Controls proposed for the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotCommand {
    pub jump: bool,
    pub duck: bool,
}

fn nearest_threat(state: &GameState) -> Option<&Obstacle> {
    let player_left = state.player.pos.x;
    state
        .obstacles
        .iter()
        .filter(|o| o.pos.x + o.size.x > player_left)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
}

/// Choose controls for the current state
pub fn plan(state: &GameState) -> PilotCommand {
    let Some(threat) = nearest_threat(state) else {
        return PilotCommand::default();
    };

    let player_front = state.player.pos.x + state.player.size.x;
    let gap = threat.pos.x - player_front;

    match threat.tier {
        ObstacleTier::Ground => PilotCommand {
            jump: gap <= threat.speed * JUMP_LEAD_TICKS && state.player.is_grounded(),
            duck: false,
        },
        ObstacleTier::Mid => PilotCommand {
            jump: false,
            duck: gap <= REACTION_DISTANCE,
        },
        // A standing runner passes under the high tier
        ObstacleTier::High => PilotCommand::default(),
    }
}
