//! Time-limited power-up effects

use crate::consts::*;

/// Gameplay modifiers granted by power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Granted by Coffee; the speed multiplier itself is applied on pickup
    SpeedBoost,
    /// Granted by Weekend; obstacle hits are ignored while active
    Invincibility,
}

impl EffectKind {
    /// Default duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match self {
            EffectKind::SpeedBoost => SPEED_BOOST_MS,
            EffectKind::Invincibility => INVINCIBILITY_MS,
        }
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::SpeedBoost => "⚡ Speed",
            EffectKind::Invincibility => "🛡️ Shield",
        }
    }
}

/// A single timed effect
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub active: bool,
}

impl Effect {
    pub fn new(kind: EffectKind, start_ms: f64) -> Self {
        Self::with_duration(kind, start_ms, kind.duration_ms())
    }

    /// Durations that are not strictly positive are clamped to one millisecond
    pub fn with_duration(kind: EffectKind, start_ms: f64, duration_ms: f64) -> Self {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(1.0)
        } else {
            kind.duration_ms()
        };
        Self {
            kind,
            start_ms,
            duration_ms,
            active: true,
        }
    }

    pub fn is_active_at(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms < self.duration_ms
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.duration_ms - (now_ms - self.start_ms)).max(0.0)
    }
}

/// The live effect list of a session
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    effects: Vec<Effect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new effect of the given kind at `now_ms`
    pub fn push(&mut self, kind: EffectKind, now_ms: f64) {
        self.effects.push(Effect::new(kind, now_ms));
    }

    /// Refresh active flags and drop whatever has expired
    pub fn expire(&mut self, now_ms: f64) {
        for effect in &mut self.effects {
            effect.active = effect.is_active_at(now_ms);
        }
        self.effects.retain(|e| e.active);
    }

    /// Whether an effect of `kind` is running at `now_ms`
    pub fn is_active(&self, kind: EffectKind, now_ms: f64) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind == kind && e.is_active_at(now_ms))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_expires_after_duration() {
        let mut effects = ActiveEffects::new();
        effects.push(EffectKind::SpeedBoost, 1_000.0);

        effects.expire(5_999.0);
        assert_eq!(effects.len(), 1);
        assert!(effects.is_active(EffectKind::SpeedBoost, 5_999.0));

        effects.expire(6_000.0);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_kinds_are_tracked_separately() {
        let mut effects = ActiveEffects::new();
        effects.push(EffectKind::Invincibility, 0.0);
        assert!(effects.is_active(EffectKind::Invincibility, 100.0));
        assert!(!effects.is_active(EffectKind::SpeedBoost, 100.0));

        effects.expire(INVINCIBILITY_MS + 1.0);
        assert!(!effects.is_active(EffectKind::Invincibility, INVINCIBILITY_MS + 1.0));
    }

    #[test]
    fn test_remaining_time_never_negative() {
        let effect = Effect::new(EffectKind::Invincibility, 0.0);
        assert_eq!(effect.remaining_ms(1_000.0), 2_000.0);
        assert_eq!(effect.remaining_ms(10_000.0), 0.0);
    }

    #[test]
    fn test_degenerate_duration_is_clamped() {
        let zero = Effect::with_duration(EffectKind::SpeedBoost, 0.0, 0.0);
        assert_eq!(zero.duration_ms, 1.0);
        let negative = Effect::with_duration(EffectKind::SpeedBoost, 0.0, -50.0);
        assert_eq!(negative.duration_ms, 1.0);
        let nan = Effect::with_duration(EffectKind::SpeedBoost, 0.0, f64::NAN);
        assert_eq!(nan.duration_ms, SPEED_BOOST_MS);
    }
}
