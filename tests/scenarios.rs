//! End-to-end runs through the public API

use bug_chase::consts::*;
use bug_chase::platform::ManualClock;
use bug_chase::sim::{
    EffectKind, GamePhase, GameState, Obstacle, ObstacleKind, ObstacleTier, PowerUp, PowerUpKind,
    start, tick,
};
use bug_chase::{GameLoop, InputState};

fn playing(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    start(&mut state, 0.0).unwrap();
    state
}

fn tick_at(n: u32) -> f64 {
    n as f64 * SIM_DT_MS
}

/// Drive the loop the way the browser host does: key handlers write to
/// their own record, each frame absorbs it. Returns the takeoffs seen.
fn run_frames(
    game: &mut GameLoop<ManualClock>,
    keyboard: &mut InputState,
    clock: &ManualClock,
    ms: f64,
) -> u32 {
    let mut takeoffs = 0;
    let mut elapsed = 0.0;
    while elapsed < ms {
        let grounded = game.state().player.is_grounded();
        clock.advance(50.0);
        elapsed += 50.0;
        game.input_mut().absorb(keyboard);
        game.frame();
        if grounded && !game.state().player.is_grounded() {
            takeoffs += 1;
        }
    }
    takeoffs
}

#[test]
fn test_distance_after_one_second_at_base_speed() {
    let mut state = playing(1);
    let mut input = InputState::default();
    assert!(tick(&mut state, &mut input, 1000.0).is_none());
    assert_eq!(state.distance, 50);
    assert_eq!(state.score, 50);
}

#[test]
fn test_distance_after_one_second_through_loop() {
    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::new(clock.clone(), 1);
    game.input_mut().key_down("Enter");
    game.frame();

    let mut steps = 0;
    for _ in 0..20 {
        clock.advance(50.0);
        steps += game.frame().steps;
    }
    assert_eq!(steps, 60);
    assert_eq!(game.state().distance, 50);
    assert_eq!(game.state().phase, GamePhase::Playing);
}

#[test]
fn test_ducking_player_passes_under_mid_obstacle() {
    let mut state = playing(2);
    let mut input = InputState {
        duck_held: true,
        ..Default::default()
    };
    tick(&mut state, &mut input, tick_at(1));
    assert!(state.player.ducking);
    assert_eq!(state.player.pos.y, 280.0);

    let id = state.next_entity_id();
    state
        .obstacles
        .push(Obstacle::at(id, ObstacleKind::Meeting, ObstacleTier::Mid, 110.0, 5.0));

    let mut n = 2;
    while !state.obstacles.is_empty() {
        assert!(tick(&mut state, &mut input, tick_at(n)).is_none());
        n += 1;
        assert!(n < 100, "obstacle never cleared");
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.stats.meetings_avoided, 1);
}

#[test]
fn test_standing_player_hits_mid_obstacle() {
    let mut state = playing(3);
    let id = state.next_entity_id();
    state
        .obstacles
        .push(Obstacle::at(id, ObstacleKind::Meeting, ObstacleTier::Mid, 110.0, 5.0));

    let mut input = InputState::default();
    let now = tick_at(1);
    let summary = tick(&mut state, &mut input, now).expect("collision ends the run");
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(summary.end_ms, now);
    assert_eq!(state.end_ms, Some(now));
    assert_eq!(summary.stats.meetings_avoided, 0);
}

#[test]
fn test_coffee_boosts_speed_for_five_seconds() {
    let mut state = playing(4);
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp::at(id, PowerUpKind::Coffee, 110.0, 5.0));

    let mut input = InputState::default();
    let collected_at = tick_at(1);
    tick(&mut state, &mut input, collected_at);
    assert!(state.power_ups.is_empty());
    assert_eq!(state.speed, 7.5);
    assert_eq!(state.stats.coffee_collected, 1);
    assert!(state.effects.is_active(EffectKind::SpeedBoost, collected_at));

    // Whatever spawned meanwhile is still far from the player
    tick(&mut state, &mut input, collected_at + 5_001.0);
    assert_eq!(state.phase, GamePhase::Playing);
    assert!(!state.effects.is_active(EffectKind::SpeedBoost, state.now_ms));
    assert!(state.effects.is_empty());
}

#[test]
fn test_game_over_is_terminal() {
    let mut state = playing(5);
    let id = state.next_entity_id();
    state
        .obstacles
        .push(Obstacle::at(id, ObstacleKind::Bug, ObstacleTier::Ground, 110.0, 5.0));
    let mut input = InputState::default();
    assert!(tick(&mut state, &mut input, tick_at(1)).is_some());

    let version = state.version;
    let score = state.score;
    let player = state.player.clone();
    let obstacles = state.obstacles.clone();
    input.jump_pressed = true;
    for n in 2..50 {
        assert!(tick(&mut state, &mut input, tick_at(n)).is_none());
    }
    assert_eq!(state.version, version);
    assert_eq!(state.score, score);
    assert_eq!(state.player, player);
    assert_eq!(state.obstacles, obstacles);
    assert!(start(&mut state, 0.0).is_err());
}

#[test]
fn test_loop_reports_finished_run_once() {
    let mut state = playing(6);
    let id = state.next_entity_id();
    state
        .obstacles
        .push(Obstacle::at(id, ObstacleKind::Deadline, ObstacleTier::Mid, 110.0, 5.0));

    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::with_state(clock.clone(), state);
    assert_eq!(game.frame().steps, 0);

    clock.advance(50.0);
    let report = game.frame();
    assert_eq!(report.steps, 1);
    assert!(report.finished.is_some());

    for _ in 0..10 {
        clock.advance(50.0);
        let report = game.frame();
        assert!(report.finished.is_none());
        assert_eq!(report.steps, 0);
    }
    assert!(game.state().is_game_over());
}

#[test]
fn test_reset_key_after_game_over_starts_fresh_session() {
    let mut state = playing(7);
    let id = state.next_entity_id();
    state
        .obstacles
        .push(Obstacle::at(id, ObstacleKind::Bug, ObstacleTier::Ground, 110.0, 5.0));
    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::with_state(clock.clone(), state);
    game.frame();
    clock.advance(20.0);
    assert!(game.frame().finished.is_some());

    game.input_mut().key_down("KeyR");
    clock.advance(20.0);
    game.frame();
    let state = game.state();
    assert_eq!(state.phase, GamePhase::Idle);
    assert_eq!(state.score, 0);
    assert!(state.obstacles.is_empty());
    assert_ne!(state.seed, 7);
}

#[test]
fn test_pause_does_not_inflate_distance() {
    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::new(clock.clone(), 8);
    game.input_mut().key_down("Enter");
    game.frame();
    for _ in 0..10 {
        clock.advance(50.0);
        game.frame();
    }
    let before = game.state().distance;

    game.input_mut().key_down("KeyP");
    game.frame();
    clock.advance(30_000.0);
    game.frame();
    game.input_mut().key_down("KeyP");
    game.frame();
    clock.advance(20.0);
    game.frame();

    let after = game.state().distance;
    assert!(after >= before);
    assert!(after <= before + 2, "distance jumped from {} to {}", before, after);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let clock = ManualClock::new(0.0);
        let mut game = GameLoop::new(clock.clone(), seed);
        game.input_mut().key_down("KeyI");
        for _ in 0..600 {
            clock.advance(16.0);
            if game.frame().finished.is_some() {
                break;
            }
        }
        let state = game.state();
        (state.summary(), state.obstacles.clone(), state.version)
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn test_held_jump_key_fires_once_per_press() {
    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::new(clock.clone(), 10);
    let mut keyboard = InputState::default();

    // Space from idle only starts the run
    keyboard.key_down("Space");
    game.input_mut().absorb(&mut keyboard);
    game.frame();
    assert!(game.state().is_playing());
    assert_eq!(run_frames(&mut game, &mut keyboard, &clock, 1_500.0), 0);

    keyboard.key_up("Space");
    keyboard.key_down("Space");
    for _ in 0..20 {
        // Auto-repeat while held
        keyboard.key_down("Space");
    }
    assert_eq!(run_frames(&mut game, &mut keyboard, &clock, 1_500.0), 1);
    assert_eq!(game.state().phase, GamePhase::Playing);
}

#[test]
fn test_mid_air_tap_does_not_fire_on_landing() {
    let clock = ManualClock::new(0.0);
    let mut game = GameLoop::new(clock.clone(), 11);
    let mut keyboard = InputState::default();
    keyboard.key_down("Enter");
    game.input_mut().absorb(&mut keyboard);
    game.frame();

    keyboard.key_down("ArrowUp");
    assert_eq!(run_frames(&mut game, &mut keyboard, &clock, 100.0), 1);
    keyboard.key_up("ArrowUp");
    run_frames(&mut game, &mut keyboard, &clock, 100.0);
    assert!(!game.state().player.is_grounded());

    keyboard.key_down("ArrowUp");
    run_frames(&mut game, &mut keyboard, &clock, 50.0);
    keyboard.key_up("ArrowUp");
    assert_eq!(run_frames(&mut game, &mut keyboard, &clock, 1_500.0), 0);
    assert!(game.state().player.is_grounded());
}
