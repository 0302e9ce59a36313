//! Keyboard actions and the per-tick input record
//!
//! Key handlers write into `InputState` between ticks; the loop driver
//! is its only reader.

/// Semantic actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Duck,
    Pause,
    Reset,
    Start,
    Autopilot,
}

/// Map a `KeyboardEvent.code` to an action
pub fn action_for_code(code: &str) -> Option<Action> {
    match code {
        "Space" | "ArrowUp" | "KeyW" => Some(Action::Jump),
        "ArrowDown" | "KeyS" => Some(Action::Duck),
        "KeyP" => Some(Action::Pause),
        "KeyR" => Some(Action::Reset),
        "Enter" => Some(Action::Start),
        "KeyI" => Some(Action::Autopilot),
        _ => None,
    }
}

/// Held and one-shot input flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Set on key down, consumed by a jump (or by starting a run)
    pub jump_pressed: bool,
    /// Jump key is physically down; repeats while held are ignored
    pub jump_held: bool,
    /// Jump key went up since the last `absorb`
    pub jump_released: bool,
    pub duck_held: bool,
    pub start_requested: bool,
    pub pause_requested: bool,
    pub reset_requested: bool,
    /// Demo mode
    pub autopilot: bool,
}

impl InputState {
    /// Apply a key press. Returns whether the key was handled, so the
    /// host can suppress the browser default (page scrolling).
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = action_for_code(code) else {
            return false;
        };
        match action {
            Action::Jump => {
                if !self.jump_held {
                    self.jump_pressed = true;
                    self.jump_released = false;
                }
                self.jump_held = true;
            }
            Action::Duck => self.duck_held = true,
            Action::Pause => self.pause_requested = true,
            Action::Reset => self.reset_requested = true,
            Action::Start => self.start_requested = true,
            Action::Autopilot => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
        }
        true
    }

    /// Apply a key release
    pub fn key_up(&mut self, code: &str) {
        match action_for_code(code) {
            Some(Action::Jump) => {
                self.jump_pressed = false;
                self.jump_held = false;
                self.jump_released = true;
            }
            Some(Action::Duck) => self.duck_held = false,
            _ => {}
        }
    }

    /// Take a pending one-shot flag
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_requested)
    }

    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_requested)
    }

    /// A start request or a jump press both start a run
    pub fn take_start(&mut self) -> bool {
        let requested = self.start_requested || self.jump_pressed;
        self.start_requested = false;
        self.jump_pressed = false;
        requested
    }

    /// Pull keyboard state recorded by event handlers into this record.
    /// One-shot requests and the jump edge move over and are cleared at
    /// the source; duck and the autopilot toggle are mirrored. Releasing
    /// jump cancels a press the loop has not consumed yet.
    pub fn absorb(&mut self, source: &mut InputState) {
        if std::mem::take(&mut source.jump_released) {
            self.jump_pressed = false;
        }
        self.jump_pressed |= std::mem::take(&mut source.jump_pressed);
        self.jump_held = source.jump_held;
        self.duck_held = source.duck_held;
        self.start_requested |= std::mem::take(&mut source.start_requested);
        self.pause_requested |= std::mem::take(&mut source.pause_requested);
        self.reset_requested |= std::mem::take(&mut source.reset_requested);
        self.autopilot = source.autopilot;
    }

    /// Drop everything except the autopilot toggle
    pub fn clear(&mut self) {
        *self = Self {
            autopilot: self.autopilot,
            ..Self::default()
        };
    }
}
