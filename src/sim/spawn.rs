//! Procedural obstacle and power-up spawning
//!
//! No entity-count cap: the population is bounded by entities scrolling
//! off the left edge.

use rand::Rng;

use super::state::{GameState, Obstacle, ObstacleKind, ObstacleTier, PowerUp, PowerUpKind};
use crate::consts::*;

/// Gap between obstacle spawns at `speed`, never below the floor
pub fn obstacle_interval_ms(speed: f32) -> f64 {
    let interval = OBSTACLE_INTERVAL_BASE_MS - OBSTACLE_INTERVAL_PER_SPEED_MS * speed as f64;
    if interval.is_finite() {
        interval.max(OBSTACLE_INTERVAL_FLOOR_MS)
    } else {
        OBSTACLE_INTERVAL_FLOOR_MS
    }
}

/// Gap before the next power-up for a uniform roll in [0, 1)
pub fn power_up_interval_ms(roll: f64) -> f64 {
    POWER_UP_INTERVAL_MIN_MS + roll.clamp(0.0, 1.0) * POWER_UP_INTERVAL_SPREAD_MS
}

/// Spawn timers for a session
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub last_obstacle_ms: f64,
    pub last_power_up_ms: f64,
    pub last_speed_increase_ms: f64,
    /// Re-rolled after every power-up spawn
    pub next_power_up_delay_ms: f64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            last_obstacle_ms: 0.0,
            last_power_up_ms: 0.0,
            last_speed_increase_ms: 0.0,
            next_power_up_delay_ms: POWER_UP_INTERVAL_MIN_MS,
        }
    }
}

impl Spawner {
    /// Arm every timer at the session start
    pub fn arm(&mut self, now_ms: f64, power_up_roll: f64) {
        self.last_obstacle_ms = now_ms;
        self.last_power_up_ms = now_ms;
        self.last_speed_increase_ms = now_ms;
        self.next_power_up_delay_ms = power_up_interval_ms(power_up_roll);
    }

    pub fn obstacle_due(&self, now_ms: f64, speed: f32) -> bool {
        now_ms - self.last_obstacle_ms > obstacle_interval_ms(speed)
    }

    pub fn power_up_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_power_up_ms > self.next_power_up_delay_ms
    }

    pub fn speed_increase_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_speed_increase_ms > SPEED_ESCALATION_INTERVAL_MS
    }
}

/// Roll a random obstacle and push it at the right edge
pub fn spawn_obstacle(state: &mut GameState) {
    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    let tier = ObstacleTier::from_roll(state.rng.random::<f32>());
    let id = state.next_entity_id();
    let obstacle = Obstacle::new(id, kind, tier, state.speed);
    log::debug!("Spawned {} {:?} at y={}", tier.as_str(), kind, obstacle.pos.y);
    state.obstacles.push(obstacle);
}

/// Roll a random power-up, push it at the right edge and re-roll the next delay
pub fn spawn_power_up(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp::new(id, kind, state.speed));
    state.spawner.next_power_up_delay_ms = power_up_interval_ms(state.rng.random::<f64>());
    log::debug!(
        "Spawned {:?}, next power-up in {:.0}ms",
        kind,
        state.spawner.next_power_up_delay_ms
    );
}

/// Run both spawn gates for the tick at `now_ms`
pub fn run_spawner(state: &mut GameState, now_ms: f64) {
    if state.spawner.obstacle_due(now_ms, state.speed) {
        spawn_obstacle(state);
        state.spawner.last_obstacle_ms = now_ms;
    }

    if state.spawner.power_up_due(now_ms) {
        spawn_power_up(state);
        state.spawner.last_power_up_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacle_interval_shrinks_with_speed() {
        assert_eq!(obstacle_interval_ms(5.0), 1_400.0);
        assert_eq!(obstacle_interval_ms(15.0), 1_200.0);
        assert!(obstacle_interval_ms(20.0) < obstacle_interval_ms(10.0));
    }

    #[test]
    fn test_obstacle_interval_floor() {
        assert_eq!(obstacle_interval_ms(70.0), OBSTACLE_INTERVAL_FLOOR_MS);
        assert_eq!(obstacle_interval_ms(1_000.0), OBSTACLE_INTERVAL_FLOOR_MS);
        assert_eq!(obstacle_interval_ms(f32::INFINITY), OBSTACLE_INTERVAL_FLOOR_MS);
    }

    #[test]
    fn test_power_up_interval_range() {
        assert_eq!(power_up_interval_ms(0.0), 5_000.0);
        assert_eq!(power_up_interval_ms(0.5), 10_000.0);
        assert!(power_up_interval_ms(0.9999) < 15_000.0);
    }

    #[test]
    fn test_armed_spawner_waits_for_interval() {
        let mut spawner = Spawner::default();
        spawner.arm(1_000.0, 0.0);
        assert!(!spawner.obstacle_due(2_400.0, 5.0));
        assert!(spawner.obstacle_due(2_401.0, 5.0));
        assert!(!spawner.power_up_due(6_000.0));
        assert!(spawner.power_up_due(6_001.0));
        assert!(!spawner.speed_increase_due(11_000.0));
        assert!(spawner.speed_increase_due(11_001.0));
    }

    #[test]
    fn test_spawned_obstacle_carries_current_speed() {
        let mut state = GameState::new(3);
        state.speed = 9.0;
        spawn_obstacle(&mut state);
        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.speed, 9.0);
        assert_eq!(obstacle.pos.x, ARENA_WIDTH);
        assert_eq!(obstacle.pos.y, obstacle.tier.y());
    }

    #[test]
    fn test_power_up_spawn_rerolls_delay() {
        let mut state = GameState::new(11);
        let mut delays = Vec::new();
        for _ in 0..20 {
            spawn_power_up(&mut state);
            let delay = state.spawner.next_power_up_delay_ms;
            assert!((5_000.0..15_000.0).contains(&delay));
            delays.push(delay);
        }
        delays.dedup();
        assert!(delays.len() > 1);
        assert_eq!(state.power_ups.len(), 20);
    }

    #[test]
    fn test_tier_distribution() {
        let mut rng = Pcg32::seed_from_u64(0xB06C4A5E);
        let n = 100_000;
        let mut counts = [0u32; 3];
        for _ in 0..n {
            match ObstacleTier::from_roll(rng.random::<f32>()) {
                ObstacleTier::Ground => counts[0] += 1,
                ObstacleTier::Mid => counts[1] += 1,
                ObstacleTier::High => counts[2] += 1,
            }
        }
        let share = |c: u32| c as f64 / n as f64;
        assert!((share(counts[0]) - 0.40).abs() < 0.01, "ground {}", share(counts[0]));
        assert!((share(counts[1]) - 0.35).abs() < 0.01, "mid {}", share(counts[1]));
        assert!((share(counts[2]) - 0.25).abs() < 0.01, "high {}", share(counts[2]));
    }

    #[test]
    fn test_kinds_are_all_reachable() {
        let mut state = GameState::new(99);
        for _ in 0..200 {
            spawn_obstacle(&mut state);
        }
        for kind in ObstacleKind::ALL {
            assert!(state.obstacles.iter().any(|o| o.kind == kind));
        }
    }
}
