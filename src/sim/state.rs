//! Game state and core simulation types
//!
//! The session exclusively owns every entity. Nothing outside the
//! simulation mutates it except through `tick` and the lifecycle
//! transitions.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounds};
use super::effects::ActiveEffects;
use super::spawn::Spawner;
use crate::consts::*;
use crate::ground_y;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start action
    Idle,
    /// Active gameplay
    Playing,
    /// Updates frozen, rendering continues
    Paused,
    /// Run ended (terminal until reset)
    GameOver,
}

/// The runner
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels/tick, negative is up)
    pub vel_y: f32,
    pub ducking: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y(PLAYER_SIZE)),
            size: Vec2::splat(PLAYER_SIZE),
            vel_y: 0.0,
            ducking: false,
        }
    }
}

impl Player {
    /// Y coordinate at which the player stands on the ground at its current height
    pub fn ground_y(&self) -> f32 {
        ground_y(self.size.y)
    }

    pub fn is_grounded(&self) -> bool {
        self.pos.y >= self.ground_y()
    }

    /// Height of the feet above the ground line
    pub fn altitude(&self) -> f32 {
        self.ground_y() - self.pos.y
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Bug,
    Deadline,
    Meeting,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Bug, ObstacleKind::Deadline, ObstacleKind::Meeting];

    pub fn glyph(&self) -> &'static str {
        match self {
            ObstacleKind::Bug => "🐛",
            ObstacleKind::Deadline => "⏰",
            ObstacleKind::Meeting => "📅",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ObstacleKind::Bug => "#ef4444",
            ObstacleKind::Deadline => "#f59e0b",
            ObstacleKind::Meeting => "#8b5cf6",
        }
    }
}

/// Height band an obstacle spawns in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleTier {
    /// Sits on the ground, jump over it
    Ground,
    /// Hangs at head height, duck under it
    Mid,
    /// Floats high
    High,
}

impl ObstacleTier {
    /// Pick a tier from a uniform roll in [0, 1): 40% ground, 35% mid, 25% high
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.40 {
            ObstacleTier::Ground
        } else if roll < 0.75 {
            ObstacleTier::Mid
        } else {
            ObstacleTier::High
        }
    }

    /// Lift of the obstacle's bottom edge above the ground line
    pub fn lift(&self) -> f32 {
        match self {
            ObstacleTier::Ground => GROUND_TIER_LIFT,
            ObstacleTier::Mid => MID_TIER_LIFT,
            ObstacleTier::High => HIGH_TIER_LIFT,
        }
    }

    pub fn y(&self) -> f32 {
        ground_y(OBSTACLE_HEIGHT) - self.lift()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleTier::Ground => "ground",
            ObstacleTier::Mid => "middle",
            ObstacleTier::High => "high",
        }
    }
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub tier: ObstacleTier,
    pub pos: Vec2,
    pub size: Vec2,
    /// Scroll rate captured at spawn time (pixels/tick)
    pub speed: f32,
}

impl Obstacle {
    /// New obstacle entering at the right edge of the arena
    pub fn new(id: u32, kind: ObstacleKind, tier: ObstacleTier, speed: f32) -> Self {
        Self::at(id, kind, tier, ARENA_WIDTH, speed)
    }

    pub fn at(id: u32, kind: ObstacleKind, tier: ObstacleTier, x: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            tier,
            pos: Vec2::new(x, tier.y()),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            speed,
        }
    }

    /// Right edge has scrolled past the left side of the arena
    pub fn is_cleared(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

impl Bounds for Obstacle {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Coffee,
    Weekend,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Coffee, PowerUpKind::Weekend];

    pub fn glyph(&self) -> &'static str {
        match self {
            PowerUpKind::Coffee => "☕",
            PowerUpKind::Weekend => "🏖️",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PowerUpKind::Coffee => "#a855f7",
            PowerUpKind::Weekend => "#22c55e",
        }
    }
}

/// A collectible power-up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, speed: f32) -> Self {
        Self::at(id, kind, ARENA_WIDTH, speed)
    }

    pub fn at(id: u32, kind: PowerUpKind, x: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(x, ground_y(POWER_UP_SIZE) - POWER_UP_LIFT),
            size: Vec2::splat(POWER_UP_SIZE),
            speed,
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

impl Bounds for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Per-run counters; only ever increase within a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub bugs_avoided: u32,
    pub deadlines_avoided: u32,
    pub meetings_avoided: u32,
    pub coffee_collected: u32,
    pub weekends_collected: u32,
}

impl RunStats {
    pub fn record_avoided(&mut self, kind: ObstacleKind) {
        match kind {
            ObstacleKind::Bug => self.bugs_avoided += 1,
            ObstacleKind::Deadline => self.deadlines_avoided += 1,
            ObstacleKind::Meeting => self.meetings_avoided += 1,
        }
    }

    pub fn record_collected(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Coffee => self.coffee_collected += 1,
            PowerUpKind::Weekend => self.weekends_collected += 1,
        }
    }

    pub fn avoided(&self, kind: ObstacleKind) -> u32 {
        match kind {
            ObstacleKind::Bug => self.bugs_avoided,
            ObstacleKind::Deadline => self.deadlines_avoided,
            ObstacleKind::Meeting => self.meetings_avoided,
        }
    }

    pub fn collected(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Coffee => self.coffee_collected,
            PowerUpKind::Weekend => self.weekends_collected,
        }
    }
}

/// Immutable summary of a finished run, handed to result submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub score: u64,
    pub distance: u64,
    pub survival_ms: f64,
    pub stats: RunStats,
    pub start_ms: f64,
    pub end_ms: f64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub distance: u64,
    /// Current scroll speed (pixels/tick)
    pub speed: f32,
    pub start_ms: Option<f64>,
    pub end_ms: Option<f64>,
    /// Timestamp of the most recent tick
    pub now_ms: f64,
    pub player: Player,
    /// Active obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Active power-ups (sorted by id)
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub stats: RunStats,
    pub spawner: Spawner,
    /// Incremented on every mutation
    pub version: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            distance: 0,
            speed: INITIAL_SPEED,
            start_ms: None,
            end_ms: None,
            now_ms: 0.0,
            player: Player::default(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::new(),
            stats: RunStats::default(),
            spawner: Spawner::default(),
            version: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Milliseconds since the run started, as of the last tick
    pub fn elapsed_ms(&self) -> f64 {
        match self.start_ms {
            Some(start) => (self.end_ms.unwrap_or(self.now_ms) - start).max(0.0),
            None => 0.0,
        }
    }

    /// Summary of the run so far (final once the phase is GameOver)
    pub fn summary(&self) -> RunSummary {
        let start_ms = self.start_ms.unwrap_or(self.now_ms);
        let end_ms = self.end_ms.unwrap_or(self.now_ms);
        RunSummary {
            score: self.score,
            distance: self.distance,
            survival_ms: (end_ms - start_ms).max(0.0),
            stats: self.stats,
            start_ms,
            end_ms,
        }
    }

    pub(crate) fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
