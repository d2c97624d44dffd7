//! Audio cues
//!
//! The engine never plays sound. The front end owns one `AudioManager`, feeds
//! it the events drained from the session, and the manager decides which cue to
//! play. On the web build cues are synthesised with the Web Audio API (no
//! asset files); natively they are only logged.

use crate::settings::GameOptions;
use crate::sim::{CountdownStep, GameEvent};

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BgmTrack {
    Title,
    Game,
    Result,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct pick
    Correct,
    /// Wrong pick
    Wrong,
    /// Countdown beat (3, 2, 1)
    Countdown,
    /// "START!"
    Start,
}

/// A cue the manager acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Bgm(BgmTrack),
    StopBgm,
    Sfx(SoundEffect),
}

/// Audio manager for the game
pub struct AudioManager {
    backend: backend::Backend,
    /// Requested track, remembered while muted so unmuting can resume it
    current_bgm: Option<BgmTrack>,
    bgm_playing: bool,
    bgm_volume: f32,
    sfx_volume: f32,
    bgm_muted: bool,
    sfx_muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            backend: backend::Backend::new(),
            current_bgm: None,
            bgm_playing: false,
            bgm_volume: 0.5,
            sfx_volume: 0.7,
            bgm_muted: false,
            sfx_muted: false,
        }
    }

    /// Adopt volume and mute state from the player's options
    pub fn sync_options(&mut self, options: &GameOptions) {
        self.set_bgm_volume(crate::settings::step_to_gain(options.bgm_volume));
        self.set_sfx_volume(crate::settings::step_to_gain(options.sfx_volume));
        self.set_sfx_muted(options.sfx_muted);
        self.set_bgm_muted(options.bgm_muted);
    }

    pub fn current_bgm(&self) -> Option<BgmTrack> {
        self.current_bgm
    }

    pub fn is_bgm_playing(&self) -> bool {
        self.bgm_playing
    }

    /// Switch background music. Requesting the track already playing is a no-op.
    pub fn play_bgm(&mut self, track: BgmTrack) {
        if self.bgm_muted {
            self.stop_bgm();
            self.current_bgm = Some(track);
            return;
        }
        if self.bgm_playing && self.current_bgm == Some(track) {
            return;
        }

        self.stop_bgm();
        self.current_bgm = Some(track);
        self.bgm_playing = self.backend.start_bgm(track, self.bgm_volume);
    }

    /// Stop the music but keep the requested track
    pub fn stop_bgm(&mut self) {
        if self.bgm_playing {
            self.backend.stop_bgm();
            self.bgm_playing = false;
        }
    }

    /// Play a sound effect; returns false if it was muted
    pub fn play_sfx(&mut self, effect: SoundEffect) -> bool {
        if self.sfx_muted || self.sfx_volume <= 0.0 {
            return false;
        }
        self.backend.play_sfx(effect, self.sfx_volume);
        true
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.bgm_volume = volume.clamp(0.0, 1.0);
        if self.bgm_playing {
            self.backend.set_bgm_gain(self.bgm_volume);
        }
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_bgm_muted(&mut self, muted: bool) {
        self.bgm_muted = muted;
        if muted {
            self.stop_bgm();
        } else if let Some(track) = self.current_bgm {
            self.play_bgm(track);
        }
    }

    pub fn set_sfx_muted(&mut self, muted: bool) {
        self.sfx_muted = muted;
    }

    /// React to an engine event
    pub fn on_event(&mut self, event: &GameEvent) -> Option<AudioCue> {
        let cue = match event {
            GameEvent::SessionStarted { .. } => AudioCue::Bgm(BgmTrack::Game),
            GameEvent::Correct { .. } => AudioCue::Sfx(SoundEffect::Correct),
            GameEvent::Miss { .. } => AudioCue::Sfx(SoundEffect::Wrong),
            GameEvent::TimeUp { .. } => AudioCue::Bgm(BgmTrack::Result),
            GameEvent::Reset => AudioCue::Bgm(BgmTrack::Title),
            GameEvent::Paused | GameEvent::Resumed => return None,
        };
        self.cue(cue)
    }

    /// React to a countdown beat
    pub fn on_countdown(&mut self, step: CountdownStep) -> Option<AudioCue> {
        match step {
            CountdownStep::Beat(_) => self.cue(AudioCue::Sfx(SoundEffect::Countdown)),
            CountdownStep::Go => self.cue(AudioCue::Sfx(SoundEffect::Start)),
            CountdownStep::Done => None,
        }
    }

    /// Act on a cue directly; returns it if anything was played or changed
    pub fn cue(&mut self, cue: AudioCue) -> Option<AudioCue> {
        match cue {
            AudioCue::Bgm(track) => {
                self.play_bgm(track);
                Some(cue)
            }
            AudioCue::StopBgm => {
                self.stop_bgm();
                Some(cue)
            }
            AudioCue::Sfx(effect) => self.play_sfx(effect).then_some(cue),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use super::{BgmTrack, SoundEffect};

    /// Headless backend: cues are logged only
    pub struct Backend;

    impl Backend {
        pub fn new() -> Self {
            Backend
        }

        pub fn start_bgm(&mut self, track: BgmTrack, volume: f32) -> bool {
            log::debug!("BGM {:?} at {:.2}", track, volume);
            true
        }

        pub fn stop_bgm(&mut self) {
            log::debug!("BGM stopped");
        }

        pub fn set_bgm_gain(&mut self, volume: f32) {
            log::debug!("BGM volume {:.2}", volume);
        }

        pub fn play_sfx(&mut self, effect: SoundEffect, volume: f32) {
            log::debug!("SFX {:?} at {:.2}", effect, volume);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{BgmTrack, SoundEffect};

    /// Music is kept quiet under the effects
    const BGM_LEVEL: f32 = 0.12;

    /// Web Audio backend with procedurally generated tones
    pub struct Backend {
        ctx: Option<AudioContext>,
        bgm: Option<(OscillatorNode, GainNode)>,
    }

    impl Backend {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, bgm: None }
        }

        /// Resume context if suspended (browsers require a user gesture)
        fn context(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                if let Err(e) = ctx.resume() {
                    log::warn!("AudioContext resume failed: {:?}", e);
                }
            }
            Some(ctx)
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short enveloped tone starting `delay` seconds from now
        fn blip(ctx: &AudioContext, freq: f32, osc_type: OscillatorType, vol: f32, delay: f64, len: f64) {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                log::warn!("Could not create oscillator");
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + len + 0.05).ok();
        }

        pub fn start_bgm(&mut self, track: BgmTrack, volume: f32) -> bool {
            let Some(ctx) = self.context() else {
                return false;
            };
            let (freq, osc_type) = match track {
                BgmTrack::Title => (220.0, OscillatorType::Sine),
                BgmTrack::Game => (330.0, OscillatorType::Triangle),
                BgmTrack::Result => (262.0, OscillatorType::Sine),
            };
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                log::warn!("BGM {:?} could not start", track);
                return false;
            };
            gain.gain().set_value(volume * BGM_LEVEL);
            if let Err(e) = osc.start() {
                log::warn!("BGM playback failed: {:?}", e);
                return false;
            }
            self.bgm = Some((osc, gain));
            true
        }

        pub fn stop_bgm(&mut self) {
            if let Some((osc, _gain)) = self.bgm.take() {
                osc.stop().ok();
            }
        }

        pub fn set_bgm_gain(&mut self, volume: f32) {
            if let Some((_, gain)) = &self.bgm {
                gain.gain().set_value(volume * BGM_LEVEL);
            }
        }

        pub fn play_sfx(&mut self, effect: SoundEffect, vol: f32) {
            let Some(ctx) = self.context() else { return };
            match effect {
                SoundEffect::Correct => {
                    Self::blip(ctx, 880.0, OscillatorType::Sine, vol * 0.4, 0.0, 0.08);
                    Self::blip(ctx, 1320.0, OscillatorType::Sine, vol * 0.4, 0.07, 0.12);
                }
                SoundEffect::Wrong => {
                    if let Some((osc, gain)) = Self::create_osc(ctx, 200.0, OscillatorType::Sawtooth) {
                        let t = ctx.current_time();
                        gain.gain().set_value_at_time(vol * 0.35, t).ok();
                        gain.gain()
                            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                            .ok();
                        osc.frequency().set_value_at_time(200.0, t).ok();
                        osc.frequency()
                            .exponential_ramp_to_value_at_time(80.0, t + 0.3)
                            .ok();
                        osc.start().ok();
                        osc.stop_with_when(t + 0.35).ok();
                    }
                }
                SoundEffect::Countdown => {
                    Self::blip(ctx, 660.0, OscillatorType::Square, vol * 0.25, 0.0, 0.1);
                }
                SoundEffect::Start => {
                    for (i, freq) in [660.0, 880.0, 1320.0].iter().enumerate() {
                        let delay = i as f64 * 0.06;
                        Self::blip(ctx, *freq, OscillatorType::Triangle, vol * 0.3, delay, 0.2);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;

    fn unmuted() -> AudioManager {
        let mut audio = AudioManager::new();
        audio.set_bgm_muted(false);
        audio.set_sfx_muted(false);
        audio
    }

    #[test]
    fn test_event_mapping() {
        let mut audio = unmuted();
        assert_eq!(
            audio.on_event(&GameEvent::SessionStarted {
                difficulty: Difficulty::Beginner
            }),
            Some(AudioCue::Bgm(BgmTrack::Game))
        );
        assert_eq!(
            audio.on_event(&GameEvent::Miss {
                value: 3,
                penalty: 5,
                time_left: 40
            }),
            Some(AudioCue::Sfx(SoundEffect::Wrong))
        );
        assert_eq!(audio.on_event(&GameEvent::Paused), None);
        assert_eq!(
            audio.on_event(&GameEvent::Reset),
            Some(AudioCue::Bgm(BgmTrack::Title))
        );
        assert_eq!(audio.current_bgm(), Some(BgmTrack::Title));
    }

    #[test]
    fn test_muted_sfx_is_skipped() {
        let mut audio = unmuted();
        audio.set_sfx_muted(true);
        let event = GameEvent::Correct { value: 4, score: 100 };
        assert_eq!(audio.on_event(&event), None);
        audio.set_sfx_muted(false);
        assert_eq!(audio.on_event(&event), Some(AudioCue::Sfx(SoundEffect::Correct)));
    }

    #[test]
    fn test_muted_bgm_resumes_requested_track() {
        let mut audio = unmuted();
        audio.set_bgm_muted(true);
        audio.play_bgm(BgmTrack::Result);
        assert!(!audio.is_bgm_playing());
        assert_eq!(audio.current_bgm(), Some(BgmTrack::Result));

        audio.set_bgm_muted(false);
        assert!(audio.is_bgm_playing());
        assert_eq!(audio.current_bgm(), Some(BgmTrack::Result));
    }

    #[test]
    fn test_countdown_cues() {
        let mut audio = unmuted();
        assert_eq!(
            audio.on_countdown(CountdownStep::Beat(2)),
            Some(AudioCue::Sfx(SoundEffect::Countdown))
        );
        assert_eq!(
            audio.on_countdown(CountdownStep::Go),
            Some(AudioCue::Sfx(SoundEffect::Start))
        );
        assert_eq!(audio.on_countdown(CountdownStep::Done), None);
    }

    #[test]
    fn test_sync_options() {
        let mut audio = AudioManager::new();
        let mut options = GameOptions::default();
        audio.sync_options(&options);
        assert!(!audio.play_sfx(SoundEffect::Correct));

        options.toggle_all_sound();
        options.set_sfx_volume(0);
        audio.sync_options(&options);
        assert!(!audio.play_sfx(SoundEffect::Correct));
        options.set_sfx_volume(2);
        audio.sync_options(&options);
        assert!(audio.play_sfx(SoundEffect::Correct));
    }
}
