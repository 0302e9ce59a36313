//! Fixed timestep loop driver
//!
//! Owns the session, the input record and the clock. The host calls
//! `frame` once per animation frame and renders `state()` afterwards.
//! Simulation time only advances while a run is playing, so a paused or
//! backgrounded tab never turns into a burst of catch-up ticks.

use crate::consts::*;
use crate::input::InputState;
use crate::platform::Clock;
use crate::sim::{GamePhase, GameState, RunSummary, plan, reset, start, tick, toggle_pause};

/// Slack for floating point drift when draining the accumulator
const ACCUMULATOR_EPSILON_MS: f64 = 1e-6;

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed ticks run this frame
    pub steps: u32,
    /// Present on the frame a run ends; never twice for one run
    pub finished: Option<RunSummary>,
}

pub struct GameLoop<C: Clock> {
    clock: C,
    state: GameState,
    input: InputState,
    accumulator_ms: f64,
    last_frame_ms: Option<f64>,
    sim_ticks: u64,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(clock: C, seed: u64) -> Self {
        Self::with_state(clock, GameState::new(seed))
    }

    /// Drive an existing session. Its timestamps must be on the loop's
    /// simulation timeline, which starts at zero.
    pub fn with_state(clock: C, state: GameState) -> Self {
        let sim_ticks = (state.now_ms / SIM_DT_MS).round().max(0.0) as u64;
        Self {
            clock,
            state,
            input: InputState::default(),
            accumulator_ms: 0.0,
            last_frame_ms: None,
            sim_ticks,
        }
    }

    /// Read-only view for renderers and UI
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Input record for key handlers
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current simulation timestamp
    pub fn sim_time_ms(&self) -> f64 {
        self.sim_ticks as f64 * SIM_DT_MS
    }

    /// Start button
    pub fn start(&mut self) {
        let now = self.sim_time_ms();
        if let Err(e) = start(&mut self.state, now) {
            log::debug!("Start ignored: {}", e);
        }
    }

    /// Pause button
    pub fn toggle_pause(&mut self) {
        if let Err(e) = toggle_pause(&mut self.state) {
            log::debug!("Pause ignored: {}", e);
        }
    }

    /// Reset button; a fresh seed is derived from the previous one
    pub fn reset(&mut self) {
        let seed = next_seed(self.state.seed);
        reset(&mut self.state, seed);
        self.input.clear();
        self.accumulator_ms = 0.0;
    }

    /// Run one animation frame
    pub fn frame(&mut self) -> FrameReport {
        let now = self.clock.now_ms();
        let delta = match self.last_frame_ms {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now);

        self.apply_actions();

        let mut report = FrameReport::default();
        if !self.state.is_playing() {
            self.accumulator_ms = 0.0;
            return report;
        }

        self.accumulator_ms += delta;
        while self.accumulator_ms + ACCUMULATOR_EPSILON_MS >= SIM_DT_MS
            && report.steps < MAX_SUBSTEPS
        {
            self.accumulator_ms -= SIM_DT_MS;
            self.sim_ticks += 1;
            report.steps += 1;

            if self.input.autopilot {
                let command = plan(&self.state);
                self.input.duck_held = command.duck;
                self.input.jump_pressed |= command.jump;
            }

            let now = self.sim_time_ms();
            if let Some(summary) = tick(&mut self.state, &mut self.input, now) {
                report.finished = Some(summary);
                self.accumulator_ms = 0.0;
                break;
            }
        }

        if report.steps == MAX_SUBSTEPS {
            self.accumulator_ms = self.accumulator_ms.min(SIM_DT_MS);
        }
        report
    }

    fn apply_actions(&mut self) {
        if self.input.take_reset() {
            if self.state.phase == GamePhase::GameOver {
                self.reset();
            } else {
                log::debug!("Reset key ignored outside game over");
            }
        }

        if self.input.take_pause() {
            self.toggle_pause();
        }

        if self.state.phase == GamePhase::Idle && (self.input.take_start() || self.input.autopilot) {
            self.start();
        }
    }
}

fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}
