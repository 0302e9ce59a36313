//! Bug Chase - a side-scrolling developer runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, effects, scoring, lifecycle)
//! - `game_loop`: Fixed timestep driver fed by an injectable clock
//! - `input`: Keyboard action mapping and the per-tick input record
//! - `renderer`: Canvas-style 2D painting through the `Surface` trait
//! - `platform`: Browser/native platform abstraction (time, listeners, init)
//! - `api`: Backend contracts (score submission, dashboard)
//! - `submission`: Result submission lifecycle with retry

pub mod api;
pub mod game_loop;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod submission;

pub use game_loop::{FrameReport, GameLoop};
pub use input::{Action, InputState};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, in milliseconds)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta a single frame may feed the simulation
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Logical arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 400.0;
    pub const GROUND_HEIGHT: f32 = 100.0;
    /// Top edge of the ground band
    pub const GROUND_LINE: f32 = ARENA_HEIGHT - GROUND_HEIGHT;

    /// Player defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_DUCK_HEIGHT: f32 = PLAYER_SIZE * 0.5;
    /// Vertical acceleration per tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.8;
    /// Upward velocity applied on jump (pixels/tick)
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Height above the ground line at which the player counts as airborne for display
    pub const AIRBORNE_THRESHOLD: f32 = 5.0;

    /// Obstacle geometry and tier lifts above the ground line
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    pub const GROUND_TIER_LIFT: f32 = 0.0;
    pub const MID_TIER_LIFT: f32 = 25.0;
    pub const HIGH_TIER_LIFT: f32 = 80.0;

    /// Power-up geometry
    pub const POWER_UP_SIZE: f32 = 25.0;
    pub const POWER_UP_LIFT: f32 = 20.0;

    /// Speed (pixels scrolled per tick)
    pub const INITIAL_SPEED: f32 = 5.0;
    pub const SPEED_STEP: f32 = 0.5;
    /// Timed escalation stops here
    pub const ESCALATION_CAP: f32 = 15.0;
    /// Absolute cap (coffee boosts can exceed the escalation cap)
    pub const MAX_SPEED: f32 = 20.0;
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;
    pub const SPEED_ESCALATION_INTERVAL_MS: f64 = 10_000.0;

    /// Effect durations
    pub const SPEED_BOOST_MS: f64 = 5_000.0;
    pub const INVINCIBILITY_MS: f64 = 3_000.0;

    /// Obstacle spawn interval: base - per_speed * speed, never below the floor
    pub const OBSTACLE_INTERVAL_BASE_MS: f64 = 1_500.0;
    pub const OBSTACLE_INTERVAL_PER_SPEED_MS: f64 = 20.0;
    pub const OBSTACLE_INTERVAL_FLOOR_MS: f64 = 200.0;

    /// Power-up spawn interval: min + U(0,1) * spread
    pub const POWER_UP_INTERVAL_MIN_MS: f64 = 5_000.0;
    pub const POWER_UP_INTERVAL_SPREAD_MS: f64 = 10_000.0;

    /// Distance units per (second * speed)
    pub const DISTANCE_SCALE: f64 = 10.0;
}

/// Y coordinate that puts an entity of the given height on the ground
#[inline]
pub fn ground_y(height: f32) -> f32 {
    consts::GROUND_LINE - height
}
