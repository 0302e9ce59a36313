//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as an argument, never sampled here
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod physics;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::{PilotCommand, plan};
pub use collision::{Aabb, Bounds, collides};
pub use effects::{ActiveEffects, Effect, EffectKind};
pub use physics::{Pose, classify_pose, step_player};
pub use spawn::{Spawner, obstacle_interval_ms, power_up_interval_ms};
pub use state::{
    GamePhase, GameState, Obstacle, ObstacleKind, ObstacleTier, Player, PowerUp, PowerUpKind,
    RunStats, RunSummary,
};
pub use tick::{TransitionError, reset, start, tick, toggle_pause};
