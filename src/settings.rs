//! Player options
//!
//! Owned by the front end, never read by the engine. Persisted separately in
//! LocalStorage on the web build.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::consts::MAX_VOLUME_STEP;

/// Display language for condition text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Ok(Language::Ja),
            "en" | "english" => Ok(Language::En),
            _ => Err(ParseError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Parse a display-size override; anything that is not a non-negative
/// integer means "no override".
pub fn parse_dimension(input: &str) -> u32 {
    input.trim().parse().unwrap_or(0)
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    // === Audio ===
    /// Music volume step (0 - 5)
    pub bgm_volume: u8,
    /// Sound effects volume step (0 - 5)
    pub sfx_volume: u8,
    pub bgm_muted: bool,
    pub sfx_muted: bool,

    // === Visual Effects ===
    /// Shake the board on a miss
    pub enable_shake: bool,
    /// Flash the board on correct/miss
    pub enable_flash: bool,

    pub language: Language,

    // === Display overrides (0 = fill the window) ===
    pub sim_width: u32,
    pub sim_height: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            bgm_volume: 3,
            sfx_volume: 3,
            // Browsers block autoplay, so start silent
            bgm_muted: true,
            sfx_muted: true,

            enable_shake: true,
            enable_flash: true,

            language: Language::Ja,

            sim_width: 0,
            sim_height: 0,
        }
    }
}

impl GameOptions {
    pub fn set_bgm_volume(&mut self, step: i32) {
        self.bgm_volume = clamp_step(step);
    }

    pub fn set_sfx_volume(&mut self, step: i32) {
        self.sfx_volume = clamp_step(step);
    }

    pub fn toggle_bgm_mute(&mut self) {
        self.bgm_muted = !self.bgm_muted;
    }

    pub fn toggle_sfx_mute(&mut self) {
        self.sfx_muted = !self.sfx_muted;
    }

    pub fn is_all_muted(&self) -> bool {
        self.bgm_muted && self.sfx_muted
    }

    /// Single speaker button: unmute everything if all muted, else mute all
    pub fn toggle_all_sound(&mut self) {
        let mute = !self.is_all_muted();
        self.bgm_muted = mute;
        self.sfx_muted = mute;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_sim_resolution(&mut self, width: u32, height: u32) {
        self.sim_width = width;
        self.sim_height = height;
    }

    /// Apply raw text-field input for the display-size override
    pub fn set_sim_resolution_input(&mut self, width: &str, height: &str) {
        self.set_sim_resolution(parse_dimension(width), parse_dimension(height));
    }

    /// Music gain in 0.0 - 1.0 (0 when muted)
    pub fn bgm_gain(&self) -> f32 {
        if self.bgm_muted {
            0.0
        } else {
            step_to_gain(self.bgm_volume)
        }
    }

    /// Effects gain in 0.0 - 1.0 (0 when muted)
    pub fn sfx_gain(&self) -> f32 {
        if self.sfx_muted {
            0.0
        } else {
            step_to_gain(self.sfx_volume)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "number_judge_options";

    /// Load options from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(options) => {
                        log::info!("Loaded options from LocalStorage");
                        return options;
                    }
                    Err(e) => log::warn!("Discarding stored options: {}", e),
                }
            }
        }

        log::info!("Using default options");
        Self::default()
    }

    /// Save options to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Options saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn clamp_step(step: i32) -> u8 {
    step.clamp(0, MAX_VOLUME_STEP as i32) as u8
}

/// Volume step (0 - 5) to linear gain
pub fn step_to_gain(step: u8) -> f32 {
    f32::from(step.min(MAX_VOLUME_STEP)) / f32::from(MAX_VOLUME_STEP)
}
