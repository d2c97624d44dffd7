//! Number Judge Speedrun - a timed number-picking reaction game
//!
//! Core modules:
//! - `sim`: Round generation, answer judging and the session state machine
//! - `audio`: Audio cues driven by session events
//! - `settings`: Player options (volume, language, effects)
//! - `platform`: Front-end shell and browser bindings

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use platform::Game;
pub use settings::{GameOptions, Language};
pub use sim::{Command, Condition, Difficulty, GameEvent, Phase, Session};

/// Game configuration constants
pub mod consts {
    /// Smallest card value
    pub const NUMBER_MIN: i32 = 1;
    /// Largest card value (small enough that ties and repeats happen)
    pub const NUMBER_MAX: i32 = 20;
    /// Fewest cards a round can have
    pub const MIN_CARD_COUNT: usize = 2;

    /// Points per correct pick
    pub const CORRECT_REWARD: u64 = 100;

    /// Seconds left at which the HUD warns
    pub const TIME_WARNING_SECS: u32 = 10;
    /// Scores at which the board's visual level steps up (levels 2, 3, 4)
    pub const VISUAL_LEVEL_THRESHOLDS: [u64; 3] = [1000, 2000, 3000];

    /// First countdown beat before a session starts
    pub const COUNTDOWN_FROM: u32 = 3;

    /// Volume sliders run 0..=MAX_VOLUME_STEP
    pub const MAX_VOLUME_STEP: u8 = 5;
}

/// Failure to read a tier or language tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown difficulty '{0}' (expected beginner, intermediate, advanced or master)")]
    UnknownDifficulty(String),
    #[error("unknown language '{0}' (expected ja or en)")]
    UnknownLanguage(String),
}
