//! 2D rendering module
//!
//! Everything is painted through the `Surface` trait: background, ground,
//! entity glyphs, the invincibility overlay and the HUD. Rendering only
//! reads the session.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{EffectKind, GamePhase, GameState, classify_pose};

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Minimal 2D drawing target
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size_px: f32, align: TextAlign, color: &str);
}

/// Colors used by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: &'static str,
    pub ground: &'static str,
    pub text: &'static str,
    pub hint: &'static str,
    pub shield_overlay: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#0f0f23",
            ground: "#4a5568",
            text: "#ffffff",
            hint: "#a1a1aa",
            shield_overlay: "rgba(34, 197, 94, 0.2)",
        }
    }
}

impl Palette {
    pub fn high_contrast() -> Self {
        Self {
            background: "#000000",
            ground: "#ffffff",
            text: "#ffffff",
            hint: "#ffff00",
            shield_overlay: "rgba(34, 197, 94, 0.35)",
        }
    }
}

/// Per-frame presentation options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub palette: Palette,
    /// Skip full-screen flashes
    pub reduced_motion: bool,
    /// Frames per second to show, if enabled
    pub fps: Option<u32>,
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            palette: if settings.high_contrast {
                Palette::high_contrast()
            } else {
                Palette::default()
            },
            reduced_motion: settings.reduced_motion,
            fps: None,
        }
    }
}

const HUD_FONT_PX: f32 = 24.0;
const HINT_FONT_PX: f32 = 20.0;
const BANNER_FONT_PX: f32 = 40.0;

fn draw_glyph<S: Surface>(surface: &mut S, glyph: &str, x: f32, y: f32, w: f32, h: f32, color: &str) {
    surface.fill_text(glyph, x + w / 2.0, y + h * 0.8, w * 0.8, TextAlign::Center, color);
}

/// Paint one frame of `state`
pub fn render<S: Surface>(state: &GameState, surface: &mut S, options: &RenderOptions) {
    let palette = &options.palette;

    surface.clear(ARENA_WIDTH, ARENA_HEIGHT);
    surface.fill_rect(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT, palette.background);
    surface.fill_rect(0.0, GROUND_LINE, ARENA_WIDTH, GROUND_HEIGHT, palette.ground);

    let player = &state.player;
    let pose = classify_pose(player);
    draw_glyph(
        surface,
        pose.glyph(),
        player.pos.x,
        player.pos.y,
        player.size.x,
        player.size.y,
        palette.text,
    );

    for obstacle in &state.obstacles {
        draw_glyph(
            surface,
            obstacle.kind.glyph(),
            obstacle.pos.x,
            obstacle.pos.y,
            obstacle.size.x,
            obstacle.size.y,
            obstacle.kind.color(),
        );
    }

    for power_up in &state.power_ups {
        draw_glyph(
            surface,
            power_up.kind.glyph(),
            power_up.pos.x,
            power_up.pos.y,
            power_up.size.x,
            power_up.size.y,
            power_up.kind.color(),
        );
    }

    if !options.reduced_motion && state.effects.is_active(EffectKind::Invincibility, state.now_ms) {
        surface.fill_rect(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT, palette.shield_overlay);
    }

    draw_hud(state, surface, options);
}

fn draw_hud<S: Surface>(state: &GameState, surface: &mut S, options: &RenderOptions) {
    let palette = &options.palette;
    surface.fill_text(&format!("Score: {}", state.score), 20.0, 40.0, HUD_FONT_PX, TextAlign::Left, palette.text);
    surface.fill_text(
        &format!("Distance: {}m", state.distance),
        20.0,
        70.0,
        HUD_FONT_PX,
        TextAlign::Left,
        palette.text,
    );

    let mut y = 100.0;
    for effect in state.effects.iter().filter(|e| e.active) {
        let seconds = (effect.remaining_ms(state.now_ms) / 1000.0).ceil();
        surface.fill_text(
            &format!("{}: {}s", effect.kind.label(), seconds),
            20.0,
            y,
            HUD_FONT_PX,
            TextAlign::Left,
            palette.text,
        );
        y += 25.0;
    }

    if let Some(fps) = options.fps {
        surface.fill_text(&format!("{} fps", fps), ARENA_WIDTH - 80.0, 30.0, 14.0, TextAlign::Left, palette.hint);
    }

    let center_x = ARENA_WIDTH / 2.0;
    let center_y = ARENA_HEIGHT / 2.0;
    match state.phase {
        GamePhase::Idle => {
            surface.fill_text("Press SPACE to start", center_x, center_y, HINT_FONT_PX, TextAlign::Center, palette.hint);
            surface.fill_text(
                "↑/SPACE: Jump  ↓: Duck  P: Pause",
                center_x,
                center_y + 30.0,
                HINT_FONT_PX,
                TextAlign::Center,
                palette.hint,
            );
        }
        GamePhase::Paused => {
            surface.fill_text("PAUSED", center_x, center_y, BANNER_FONT_PX, TextAlign::Center, palette.text);
            surface.fill_text("P: Resume", center_x, center_y + 30.0, HINT_FONT_PX, TextAlign::Center, palette.hint);
        }
        GamePhase::GameOver => {
            surface.fill_text("GAME OVER", center_x, center_y, BANNER_FONT_PX, TextAlign::Center, palette.text);
            surface.fill_text("R: Play again", center_x, center_y + 30.0, HINT_FONT_PX, TextAlign::Center, palette.hint);
        }
        GamePhase::Playing => {}
    }
}
