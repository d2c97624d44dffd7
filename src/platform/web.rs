//! JavaScript bindings
//!
//! The page owns the DOM, the animation frame loop and the click handlers; it
//! calls into `WebGame` and renders from the JSON snapshot.

use wasm_bindgen::prelude::*;

use super::Game;
use crate::settings::{GameOptions, Language};
use crate::sim::{Command, Difficulty};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Already initialised when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Number Judge starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = js_sys::Date::now() as u64;
        WebGame {
            game: Game::new(seed, GameOptions::load()),
        }
    }

    /// Start the 3-2-1 countdown for a tier name
    pub fn begin(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e: crate::ParseError| JsValue::from_str(&e.to_string()))?;
        self.game.begin_countdown(difficulty);
        Ok(())
    }

    /// Retry at the current tier, countdown included
    pub fn retry(&mut self) {
        let difficulty = self.game.session().difficulty();
        self.game.begin_countdown(difficulty);
    }

    /// Card click; `undefined` when the answer was ignored
    pub fn submit(&mut self, value: i32) -> Option<bool> {
        self.game.submit(value)
    }

    /// Animation frame, `dt_ms` since the previous one
    pub fn update(&mut self, dt_ms: f64) {
        self.game.update(dt_ms / 1000.0);
    }

    pub fn pause(&mut self) {
        self.game.command(Command::Pause);
    }

    pub fn resume(&mut self) {
        self.game.command(Command::Resume);
    }

    pub fn reset(&mut self) {
        self.game.command(Command::Reset);
    }

    pub fn is_playing(&self) -> bool {
        self.game.session().is_playing()
    }

    /// Countdown label ("3", "2", "1", "START!") or `undefined`
    pub fn countdown_label(&self) -> Option<String> {
        use crate::sim::CountdownStep;
        match self.game.countdown()? {
            CountdownStep::Beat(n) => Some(n.to_string()),
            CountdownStep::Go => Some("START!".to_string()),
            CountdownStep::Done => None,
        }
    }

    pub fn condition_text(&self) -> Option<String> {
        self.game.condition_text()
    }

    pub fn visual_level(&self) -> u8 {
        self.game.session().visual_level()
    }

    pub fn is_time_warning(&self) -> bool {
        self.game.session().is_time_warning()
    }

    /// Session snapshot as JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.game.session().snapshot()).unwrap_or_default()
    }

    /// Events since the last call, as a JSON array
    pub fn events_json(&mut self) -> String {
        serde_json::to_string(&self.game.take_events()).unwrap_or_default()
    }

    /// Options as JSON
    pub fn options_json(&self) -> String {
        serde_json::to_string(self.game.options()).unwrap_or_default()
    }

    pub fn language(&self) -> String {
        self.game.language().as_str().to_string()
    }

    /// Unknown tags are ignored
    pub fn set_language(&mut self, tag: &str) {
        match tag.parse::<Language>() {
            Ok(language) => self.game.update_options(|o| o.set_language(language)),
            Err(e) => log::warn!("{}", e),
        }
    }

    pub fn set_bgm_volume(&mut self, step: i32) {
        self.game.update_options(|o| o.set_bgm_volume(step));
    }

    pub fn set_sfx_volume(&mut self, step: i32) {
        self.game.update_options(|o| o.set_sfx_volume(step));
    }

    pub fn toggle_bgm_mute(&mut self) {
        self.game.update_options(GameOptions::toggle_bgm_mute);
    }

    pub fn toggle_sfx_mute(&mut self) {
        self.game.update_options(GameOptions::toggle_sfx_mute);
    }

    pub fn toggle_sound(&mut self) {
        self.game.update_options(GameOptions::toggle_all_sound);
    }

    pub fn set_enable_shake(&mut self, enable: bool) {
        self.game.update_options(|o| o.enable_shake = enable);
    }

    pub fn set_enable_flash(&mut self, enable: bool) {
        self.game.update_options(|o| o.enable_flash = enable);
    }

    /// Raw text-field values; non-numeric input disables the override
    pub fn set_sim_resolution(&mut self, width: &str, height: &str) {
        self.game
            .update_options(|o| o.set_sim_resolution_input(width, height));
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
