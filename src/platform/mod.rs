//! Front-end shell
//!
//! Glues the engine to its collaborators:
//! - Frame time → countdown beats and one-second session ticks
//! - Session events → audio cues
//! - Player options and language selection
//!
//! `web` exposes the same surface to JavaScript on the wasm build.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::audio::{AudioCue, AudioManager, BgmTrack};
use crate::settings::{GameOptions, Language};
use crate::sim::{
    Command, Countdown, CountdownStep, Difficulty, GameEvent, Phase, SecondClock, Session,
};

/// Longest frame delta fed to the countdown, in seconds
const MAX_COUNTDOWN_DT: f64 = 0.25;

/// Everything a screen needs: the session and the things around it
pub struct Game {
    session: Session,
    options: GameOptions,
    audio: AudioManager,
    clock: SecondClock,
    countdown: Option<Countdown>,
    countdown_elapsed: f64,
    /// Events not yet handed to the presentation layer
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64, options: GameOptions) -> Self {
        let mut audio = AudioManager::new();
        audio.sync_options(&options);
        audio.play_bgm(BgmTrack::Title);
        log::info!("Game initialized with seed: {}", seed);

        Self {
            session: Session::new(seed),
            options,
            audio,
            clock: SecondClock::new(),
            countdown: None,
            countdown_elapsed: 0.0,
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn language(&self) -> Language {
        self.options.language
    }

    /// Current condition text in the player's language
    pub fn condition_text(&self) -> Option<String> {
        self.session
            .condition()
            .map(|c| c.description_for(self.options.language))
    }

    /// Change options, push them to audio and persist them
    pub fn update_options(&mut self, f: impl FnOnce(&mut GameOptions)) {
        f(&mut self.options);
        self.audio.sync_options(&self.options);
        self.options.save();
    }

    /// Forward a command to the session and route what it emitted.
    ///
    /// While a countdown runs it owns the start: `Start` is ignored and
    /// `Reset` cancels the countdown.
    pub fn command(&mut self, command: Command) {
        if self.countdown.is_some() {
            match command {
                Command::Start => {
                    log::debug!("Ignoring start during countdown");
                    return;
                }
                Command::Reset => {
                    self.countdown = None;
                    self.countdown_elapsed = 0.0;
                }
                _ => {}
            }
        }
        self.session.apply(command);
        if !self.session.is_playing() {
            self.clock.stop();
        }
        self.route_events();
    }

    /// Card pick; the verdict, or `None` if the session ignored it
    pub fn submit(&mut self, value: i32) -> Option<bool> {
        let verdict = self.session.submit_answer(value);
        self.route_events();
        verdict
    }

    /// Pick a tier and run the 3-2-1 countdown; the session starts when it ends.
    ///
    /// Ignored unless the session is idle or over, or a countdown is running.
    pub fn begin_countdown(&mut self, difficulty: Difficulty) {
        if self.countdown.is_some() || !matches!(self.session.phase(), Phase::Idle | Phase::Ended) {
            log::debug!("Ignoring countdown while {:?}", self.session.phase());
            return;
        }
        self.session.set_difficulty(difficulty);
        self.audio.cue(AudioCue::StopBgm);

        let countdown = Countdown::default();
        self.audio.on_countdown(countdown.current());
        self.countdown = Some(countdown);
        self.countdown_elapsed = 0.0;
    }

    /// What the countdown is showing, if one is running
    pub fn countdown(&self) -> Option<CountdownStep> {
        self.countdown.as_ref().map(Countdown::current)
    }

    /// Advance by one frame of `dt` seconds
    pub fn update(&mut self, dt: f64) {
        if let Some(countdown) = self.countdown.as_mut() {
            self.countdown_elapsed += dt.clamp(0.0, MAX_COUNTDOWN_DT);
            while self.countdown_elapsed >= 1.0 {
                self.countdown_elapsed -= 1.0;
                let step = countdown.advance();
                self.audio.on_countdown(step);
                if step == CountdownStep::Done {
                    self.countdown = None;
                    self.countdown_elapsed = 0.0;
                    self.session.start();
                    break;
                }
            }
        } else {
            self.clock.update(dt, &mut self.session);
        }
        self.route_events();
    }

    /// Take the events since the last call (for flashes, shakes, score popups)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn route_events(&mut self) {
        for event in self.session.drain_events() {
            self.audio.on_event(&event);
            self.events.push(event);
        }
    }
}
