//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, where the page's toggles save
//! them. Native builds start from the defaults and accept environment
//! overrides.

use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:7276/api/bugchase";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bug Chase backend root, without a trailing slash
    pub api_base_url: String,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no invincibility flash)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,

    /// `log` level filter name
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            seed: None,
            show_fps: false,
            reduced_motion: false,
            high_contrast: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bug_chase_settings";

    /// Parsed log level, falling back to `Info`
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Apply `BUG_CHASE_API` / `BUG_CHASE_SEED` style overrides. Invalid
    /// seeds are ignored with a warning.
    pub fn apply_overrides(&mut self, api_base_url: Option<String>, seed: Option<String>) {
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = seed {
            match raw.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("Ignoring invalid seed override '{}'", raw),
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Defaults plus environment overrides
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(
            std::env::var("BUG_CHASE_API").ok(),
            std::env::var("BUG_CHASE_SEED").ok(),
        );
        settings
    }
}
