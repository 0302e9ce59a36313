//! Player kinematics and horizontal scrolling
//!
//! All values are per tick; the loop driver runs ticks at a fixed rate.

use super::state::{Obstacle, Player, PowerUp};
use crate::consts::*;
use crate::ground_y;

/// Advance the player by one tick.
///
/// `jump` is a one-shot request: it is cleared when a jump actually
/// happens and left pending otherwise. `duck` is a held flag.
pub fn step_player(player: &mut Player, jump: &mut bool, duck: bool) {
    // Gravity applies unconditionally; grounding clamps it away below
    player.vel_y += GRAVITY;

    if *jump && player.is_grounded() {
        player.vel_y = JUMP_IMPULSE;
        *jump = false;
    }

    player.pos.y += player.vel_y;

    if player.pos.y >= player.ground_y() {
        player.pos.y = player.ground_y();
        player.vel_y = 0.0;
    }

    if duck && player.is_grounded() {
        player.size.y = PLAYER_DUCK_HEIGHT;
        player.pos.y = ground_y(PLAYER_DUCK_HEIGHT);
        player.ducking = true;
    } else {
        if player.size.y < PLAYER_SIZE {
            // Stand up around the feet so the box never sinks into the ground
            let feet = player.pos.y + player.size.y;
            player.size.y = PLAYER_SIZE;
            player.pos.y = feet - PLAYER_SIZE;
            if player.pos.y >= player.ground_y() {
                player.pos.y = player.ground_y();
                player.vel_y = player.vel_y.min(0.0);
            }
        }
        player.ducking = false;
    }
}

/// Scroll obstacles left by their captured speed
pub fn scroll_obstacles(obstacles: &mut [Obstacle]) {
    for obstacle in obstacles {
        obstacle.pos.x -= obstacle.speed;
    }
}

/// Scroll power-ups left by their captured speed
pub fn scroll_power_ups(power_ups: &mut [PowerUp]) {
    for power_up in power_ups {
        power_up.pos.x -= power_up.speed;
    }
}

/// Display pose of the player, for rendering only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Running,
    Airborne,
    Ducking,
}

impl Pose {
    pub fn glyph(&self) -> &'static str {
        match self {
            Pose::Running => "🧍",
            Pose::Airborne => "🦘",
            Pose::Ducking => "🤸",
        }
    }
}

/// Classify the player's pose. Never feeds back into collision math.
pub fn classify_pose(player: &Player) -> Pose {
    if player.ducking {
        Pose::Ducking
    } else if player.altitude() > AIRBORNE_THRESHOLD {
        Pose::Airborne
    } else {
        Pose::Running
    }
}
