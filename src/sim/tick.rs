//! Simulation tick and session lifecycle
//!
//! Per tick: physics, spawning, collision and removal, effects, score.
//! Nothing runs unless the phase is exactly `Playing`.

use rand::Rng;
use thiserror::Error;

use super::collision::{Bounds, collides};
use super::effects::EffectKind;
use super::physics::{scroll_obstacles, scroll_power_ups, step_player};
use super::score::{boosted_speed, clamp_speed, distance_for, escalate_speed, score_for};
use super::spawn::run_spawner;
use super::state::{GamePhase, GameState, PowerUpKind, RunSummary};
use crate::input::InputState;

/// Rejected lifecycle transitions
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot start: run is {0:?}")]
    CannotStart(GamePhase),
    #[error("cannot pause: run is {0:?}")]
    CannotPause(GamePhase),
}

/// Idle -> Playing
pub fn start(state: &mut GameState, now_ms: f64) -> Result<(), TransitionError> {
    if state.phase != GamePhase::Idle {
        return Err(TransitionError::CannotStart(state.phase));
    }
    let roll = state.rng.random::<f64>();
    state.spawner.arm(now_ms, roll);
    state.start_ms = Some(now_ms);
    state.end_ms = None;
    state.now_ms = now_ms;
    state.phase = GamePhase::Playing;
    state.bump_version();
    log::info!("Run started (seed {})", state.seed);
    Ok(())
}

/// Playing <-> Paused
pub fn toggle_pause(state: &mut GameState) -> Result<GamePhase, TransitionError> {
    state.phase = match state.phase {
        GamePhase::Playing => GamePhase::Paused,
        GamePhase::Paused => GamePhase::Playing,
        other => return Err(TransitionError::CannotPause(other)),
    };
    state.bump_version();
    log::info!("Run {:?}", state.phase);
    Ok(state.phase)
}

/// Any phase -> Idle with a fresh session. The version keeps counting.
pub fn reset(state: &mut GameState, seed: u64) {
    let version = state.version;
    *state = GameState::new(seed);
    state.version = version;
    state.bump_version();
    log::info!("Run reset (seed {})", seed);
}

/// Advance the session by one tick at `now_ms`.
///
/// Returns the run summary on the tick the run ends; that happens at most
/// once per session.
pub fn tick(state: &mut GameState, input: &mut InputState, now_ms: f64) -> Option<RunSummary> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    state.now_ms = now_ms;
    state.speed = clamp_speed(state.speed);

    step_player(&mut state.player, &mut input.jump_pressed, input.duck_held);

    run_spawner(state, now_ms);

    scroll_obstacles(&mut state.obstacles);
    let invincible = state.effects.is_active(EffectKind::Invincibility, now_ms);
    if !invincible && state.obstacles.iter().any(|o| collides(&state.player, o)) {
        return Some(game_over(state, now_ms));
    }

    let cleared: Vec<_> = state
        .obstacles
        .iter()
        .filter(|o| o.is_cleared())
        .map(|o| o.kind)
        .collect();
    for kind in cleared {
        state.stats.record_avoided(kind);
    }
    state.obstacles.retain(|o| !o.is_cleared());

    scroll_power_ups(&mut state.power_ups);
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if state.player.collides_with(p) {
            collected.push(p.kind);
            false
        } else {
            !p.is_off_screen()
        }
    });
    for kind in collected {
        apply_power_up(state, kind, now_ms);
    }

    state.effects.expire(now_ms);

    update_score(state, now_ms);

    if state.spawner.speed_increase_due(now_ms) {
        state.speed = escalate_speed(state.speed);
        state.spawner.last_speed_increase_ms = now_ms;
        log::debug!("Speed now {}", state.speed);
    }

    state.normalize_order();
    state.bump_version();
    None
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind, now_ms: f64) {
    state.stats.record_collected(kind);
    match kind {
        PowerUpKind::Coffee => {
            state.effects.push(EffectKind::SpeedBoost, now_ms);
            state.speed = boosted_speed(state.speed);
        }
        PowerUpKind::Weekend => {
            state.effects.push(EffectKind::Invincibility, now_ms);
        }
    }
    log::debug!("Collected {:?}", kind);
}

fn update_score(state: &mut GameState, now_ms: f64) {
    let elapsed = state.start_ms.map(|s| now_ms - s).unwrap_or(0.0);
    state.distance = distance_for(elapsed, state.speed);
    state.score = score_for(state.distance, &state.stats);
}

fn game_over(state: &mut GameState, now_ms: f64) -> RunSummary {
    update_score(state, now_ms);
    state.end_ms = Some(now_ms);
    state.phase = GamePhase::GameOver;
    state.bump_version();
    let summary = state.summary();
    log::info!(
        "Game over: score {} distance {} after {:.1}s",
        summary.score,
        summary.distance,
        summary.survival_ms / 1000.0
    );
    summary
}
