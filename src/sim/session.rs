//! Session state machine
//!
//! Owns score, clock, phase and the current round. All mutation goes through
//! the named commands (or `apply`), each of which runs to completion. Commands
//! that make no sense in the current phase are ignored.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::condition::{Condition, generate_condition};
use super::difficulty::Difficulty;
use super::evaluate::evaluate;
use super::numbers::{NumberSet, generate_numbers};
use crate::consts::{CORRECT_REWARD, TIME_WARNING_SECS, VISUAL_LEVEL_THRESHOLDS};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No round dealt, clock full
    #[default]
    Idle,
    /// Clock running, answers accepted
    Playing,
    /// Clock and round frozen
    Paused,
    /// Clock ran out; final round kept for display
    Ended,
}

/// External input, applied one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetDifficulty(Difficulty),
    Start,
    Submit(i32),
    Tick,
    Pause,
    Resume,
    Reset,
}

/// Things that happened, for presentation and audio to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted { difficulty: Difficulty },
    Correct { value: i32, score: u64 },
    Miss { value: i32, penalty: u32, time_left: u32 },
    TimeUp { score: u64, correct_count: u32, miss_count: u32 },
    Paused,
    Resumed,
    Reset,
}

/// Cards and rule for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub numbers: NumberSet,
    pub condition: Condition,
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub playing: bool,
    pub difficulty: Difficulty,
    pub score: u64,
    pub time_left: u32,
    pub correct_count: u32,
    pub miss_count: u32,
    pub round_index: u32,
    pub numbers: Vec<i32>,
    pub condition: Option<Condition>,
    pub description_ja: Option<String>,
    pub description_en: Option<String>,
}

/// One play-through, from start to time-up or reset
#[derive(Debug, Clone)]
pub struct Session {
    seed: u64,
    rng: Pcg32,
    difficulty: Difficulty,
    phase: Phase,
    score: u64,
    time_left: u32,
    correct_count: u32,
    miss_count: u32,
    /// Rounds dealt since the last start
    round_index: u32,
    round: Option<Round>,
    /// Set by a correct answer, taken by the next round generation
    last_correct_value: Option<i32>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Idle session at the default tier with a seeded RNG
    pub fn new(seed: u64) -> Self {
        let difficulty = Difficulty::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            phase: Phase::Idle,
            score: 0,
            time_left: difficulty.setting().round_time_budget,
            correct_count: 0,
            miss_count: 0,
            round_index: 0,
            round: None,
            last_correct_value: None,
            events: Vec::new(),
        }
    }

    /// Apply a single command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetDifficulty(difficulty) => self.set_difficulty(difficulty),
            Command::Start => self.start(),
            Command::Submit(value) => {
                self.submit_answer(value);
            }
            Command::Tick => self.tick(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => self.reset(),
        }
    }

    /// Choose the tier for the next start.
    ///
    /// Ignored while a session is in progress, so the dealt round always
    /// matches its tier.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        match self.phase {
            Phase::Idle => {
                self.difficulty = difficulty;
                self.time_left = difficulty.setting().round_time_budget;
            }
            Phase::Ended => self.difficulty = difficulty,
            Phase::Playing | Phase::Paused => {
                log::debug!("Ignoring difficulty change to {} mid-session", difficulty);
            }
        }
    }

    /// Begin a session (or retry after time-up)
    pub fn start(&mut self) {
        if !matches!(self.phase, Phase::Idle | Phase::Ended) {
            log::debug!("Ignoring start while {:?}", self.phase);
            return;
        }

        let setting = self.difficulty.setting();
        self.score = 0;
        self.correct_count = 0;
        self.miss_count = 0;
        self.round_index = 0;
        self.time_left = setting.round_time_budget;
        self.last_correct_value = None;
        self.deal_round();
        self.phase = Phase::Playing;

        log::info!(
            "Session started: {} ({} cards, {}s, -{}s per miss)",
            self.difficulty,
            setting.card_count,
            setting.round_time_budget,
            setting.miss_penalty
        );
        self.events.push(GameEvent::SessionStarted {
            difficulty: self.difficulty,
        });
    }

    /// Judge a picked card and move on to a new round.
    ///
    /// Returns the verdict, or `None` if the answer was ignored because the
    /// session is not playing.
    pub fn submit_answer(&mut self, value: i32) -> Option<bool> {
        if self.phase != Phase::Playing {
            log::debug!("Ignoring answer {} while {:?}", value, self.phase);
            return None;
        }
        let round = self.round.as_ref()?;

        let correct = evaluate(value, &round.numbers, &round.condition);
        if correct {
            self.score += CORRECT_REWARD;
            self.correct_count += 1;
            self.last_correct_value = Some(value);
            self.events.push(GameEvent::Correct {
                value,
                score: self.score,
            });
        } else {
            let penalty = self.difficulty.setting().miss_penalty;
            self.time_left = self.time_left.saturating_sub(penalty);
            self.miss_count += 1;
            self.last_correct_value = None;
            self.events.push(GameEvent::Miss {
                value,
                penalty,
                time_left: self.time_left,
            });
        }

        self.deal_round();
        Some(correct)
    }

    /// One second of game clock
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.phase = Phase::Ended;
            log::info!(
                "Time up: score {} ({} correct, {} miss)",
                self.score,
                self.correct_count,
                self.miss_count
            );
            self.events.push(GameEvent::TimeUp {
                score: self.score,
                correct_count: self.correct_count,
                miss_count: self.miss_count,
            });
        }
    }

    /// Freeze the clock and the round.
    ///
    /// A session drained to zero by a penalty is still `Playing` and can be
    /// paused; the first tick after resuming ends it.
    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
            self.events.push(GameEvent::Resumed);
        }
    }

    /// Back to idle with a full clock for the current tier
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.round = None;
        self.last_correct_value = None;
        self.score = 0;
        self.correct_count = 0;
        self.miss_count = 0;
        self.round_index = 0;
        self.time_left = self.difficulty.setting().round_time_budget;
        self.events.push(GameEvent::Reset);
    }

    /// Replace numbers and condition together
    fn deal_round(&mut self) {
        let previous = self.last_correct_value.take();
        let numbers = generate_numbers(&mut self.rng, self.difficulty.setting().card_count);
        let condition = generate_condition(&mut self.rng, &numbers, self.difficulty, previous);
        debug_assert!(condition.is_satisfiable(&numbers));

        self.round_index += 1;
        self.round = Some(Round { numbers, condition });
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Cards on the board (empty when idle)
    pub fn numbers(&self) -> &[i32] {
        self.round.as_ref().map_or(&[], |r| r.numbers.as_slice())
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.round.as_ref().map(|r| &r.condition)
    }

    /// Presentation intensity, 1 to 4, rising with score
    pub fn visual_level(&self) -> u8 {
        1 + VISUAL_LEVEL_THRESHOLDS
            .iter()
            .filter(|&&threshold| self.score >= threshold)
            .count() as u8
    }

    /// Low-time warning while playing
    pub fn is_time_warning(&self) -> bool {
        self.is_playing() && self.time_left <= TIME_WARNING_SECS
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let condition = self.condition().copied();
        SessionSnapshot {
            phase: self.phase,
            playing: self.is_playing(),
            difficulty: self.difficulty,
            score: self.score,
            time_left: self.time_left,
            correct_count: self.correct_count,
            miss_count: self.miss_count,
            round_index: self.round_index,
            numbers: self.numbers().to_vec(),
            condition,
            description_ja: condition.map(|c| c.description_ja()),
            description_en: condition.map(|c| c.description_en()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::condition::ConditionKind;

    /// A card that satisfies the active condition
    fn correct_value(session: &Session) -> i32 {
        let round = session.round().expect("round dealt");
        *round
            .numbers
            .iter()
            .find(|&&n| round.condition.check(n, &round.numbers))
            .expect("condition satisfiable")
    }

    /// Never on the board, so always wrong
    const WRONG: i32 = 1000;

    fn started(difficulty: Difficulty, seed: u64) -> Session {
        let mut session = Session::new(seed);
        session.set_difficulty(difficulty);
        session.start();
        session
    }

    #[test]
    fn test_pause_at_zero_then_tick_ends() {
        let mut session = started(Difficulty::Master, 3);
        while session.time_left() > 0 {
            session.submit_answer(WRONG);
        }
        assert_eq!(session.phase(), Phase::Playing);

        session.pause();
        session.tick();
        assert_eq!(session.phase(), Phase::Paused);

        session.resume();
        session.tick();
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(
            session
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::TimeUp { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_start_deals_tier_sized_round() {
        for tier in Difficulty::ALL {
            let session = started(tier, 1);
            assert_eq!(session.phase(), Phase::Playing);
            assert_eq!(session.numbers().len(), tier.setting().card_count);
            assert_eq!(session.time_left(), tier.setting().round_time_budget);
            assert!(session.condition().is_some());
            assert_eq!(session.round_index(), 1);
        }
    }

    #[test]
    fn test_correct_answer_scores_and_redeals() {
        let mut session = started(Difficulty::Intermediate, 5);
        let value = correct_value(&session);
        let time_before = session.time_left();

        assert_eq!(session.submit_answer(value), Some(true));
        assert_eq!(session.score(), CORRECT_REWARD);
        assert_eq!(session.correct_count(), 1);
        assert_eq!(session.miss_count(), 0);
        assert_eq!(session.time_left(), time_before);
        assert_eq!(session.round_index(), 2);
        assert_eq!(session.numbers().len(), 4);
    }

    #[test]
    fn test_wrong_answer_costs_penalty_and_redeals() {
        let mut session = started(Difficulty::Advanced, 5);
        assert_eq!(session.submit_answer(WRONG), Some(false));
        assert_eq!(session.time_left(), 50 - 8);
        assert_eq!(session.miss_count(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.round_index(), 2);
    }

    #[test]
    fn test_penalty_clamps_at_zero() {
        let mut session = started(Difficulty::Master, 9);
        for _ in 0..10 {
            session.submit_answer(WRONG);
        }
        assert_eq!(session.time_left(), 0);
        assert_eq!(session.miss_count(), 10);
        // Still playing until the next tick observes the empty clock
        assert!(session.is_playing());
        session.tick();
        assert_eq!(session.phase(), Phase::Ended);
    }

    #[test]
    fn test_tick_runs_clock_down_and_ends_once() {
        let mut session = started(Difficulty::Beginner, 2);
        session.drain_events();
        for expected in (0..60).rev() {
            session.tick();
            assert_eq!(session.time_left(), expected);
        }
        assert_eq!(session.phase(), Phase::Ended);
        assert!(!session.is_playing());

        session.tick();
        session.tick();
        assert_eq!(session.time_left(), 0);
        let time_ups = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::TimeUp { .. }))
            .count();
        assert_eq!(time_ups, 1);
    }

    #[test]
    fn test_commands_ignored_when_not_playing() {
        let mut session = Session::new(3);
        assert_eq!(session.submit_answer(4), None);
        session.tick();
        assert_eq!(session.time_left(), 60);
        assert_eq!(session.phase(), Phase::Idle);

        session.start();
        session.pause();
        let before = session.snapshot();
        assert_eq!(session.submit_answer(correct_value(&session)), None);
        session.tick();
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_pause_resume_keeps_round() {
        let mut session = started(Difficulty::Master, 11);
        session.tick();
        let before = session.snapshot();
        session.pause();
        assert_eq!(session.phase(), Phase::Paused);
        session.resume();
        let after = session.snapshot();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reset_restores_idle() {
        let mut session = started(Difficulty::Advanced, 4);
        let value = correct_value(&session);
        session.submit_answer(value);
        session.submit_answer(WRONG);
        session.tick();
        session.reset();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.miss_count(), 0);
        assert_eq!(session.time_left(), 50);
        assert!(session.numbers().is_empty());
        assert!(session.condition().is_none());
    }

    #[test]
    fn test_difficulty_locked_mid_session() {
        let mut session = started(Difficulty::Beginner, 8);
        session.set_difficulty(Difficulty::Master);
        assert_eq!(session.difficulty(), Difficulty::Beginner);
        session.submit_answer(WRONG);
        assert_eq!(session.numbers().len(), 3);

        session.reset();
        session.set_difficulty(Difficulty::Master);
        assert_eq!(session.time_left(), 45);
    }

    #[test]
    fn test_retry_after_time_up() {
        let mut session = started(Difficulty::Beginner, 6);
        session.submit_answer(correct_value(&session));
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.phase(), Phase::Ended);
        assert!(!session.numbers().is_empty());

        session.set_difficulty(Difficulty::Intermediate);
        session.start();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.numbers().len(), 4);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut session = started(Difficulty::Beginner, 6);
        session.submit_answer(correct_value(&session));
        session.start();
        assert_eq!(session.score(), CORRECT_REWARD);
    }

    #[test]
    fn test_apply_routes_commands() {
        let mut session = Session::new(21);
        session.apply(Command::SetDifficulty(Difficulty::Master));
        session.apply(Command::Start);
        session.apply(Command::Submit(WRONG));
        session.apply(Command::Tick);
        assert_eq!(session.time_left(), 45 - 10 - 1);
        session.apply(Command::Pause);
        assert_eq!(session.phase(), Phase::Paused);
        session.apply(Command::Resume);
        session.apply(Command::Reset);
        assert_eq!(session.phase(), Phase::Idle);

        let events = session.drain_events();
        assert_eq!(
            events.first(),
            Some(&GameEvent::SessionStarted {
                difficulty: Difficulty::Master
            })
        );
        assert_eq!(events.last(), Some(&GameEvent::Reset));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_memory_references_last_correct_answer() {
        let mut session = started(Difficulty::Master, 17);
        let mut memory_rounds = 0;
        for _ in 0..2000 {
            let value = correct_value(&session);
            session.submit_answer(value);
            if let Some(Condition::Memory { previous }) = session.condition() {
                assert_eq!(*previous, value);
                memory_rounds += 1;
            }
        }
        assert!(memory_rounds > 0);
    }

    #[test]
    fn test_miss_breaks_memory_chain() {
        let mut session = started(Difficulty::Master, 23);
        for _ in 0..2000 {
            session.submit_answer(correct_value(&session));
            session.submit_answer(WRONG);
            assert_ne!(
                session.condition().map(|c| c.kind()),
                Some(ConditionKind::Memory)
            );
            // Keep the clock from running out
            if session.time_left() < 20 {
                session.reset();
                session.start();
            }
        }
    }

    #[test]
    fn test_visual_level_and_warning() {
        let mut session = started(Difficulty::Beginner, 31);
        assert_eq!(session.visual_level(), 1);
        for _ in 0..10 {
            session.submit_answer(correct_value(&session));
        }
        assert_eq!(session.visual_level(), 2);
        assert!(!session.is_time_warning());
        for _ in 0..50 {
            session.tick();
        }
        assert!(session.is_time_warning());
    }

    #[test]
    fn test_same_seed_same_rounds() {
        let mut a = started(Difficulty::Master, 99);
        let mut b = started(Difficulty::Master, 99);
        assert_eq!(a.seed(), 99);
        for _ in 0..50 {
            assert_eq!(a.round(), b.round());
            let value = correct_value(&a);
            a.submit_answer(value);
            b.submit_answer(value);
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = started(Difficulty::Beginner, 1);
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains(r#""phase":"playing""#));
        assert!(json.contains(r#""difficulty":"beginner""#));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Step {
            Correct,
            Wrong,
            Tick,
            Pause,
            Resume,
            Start,
            Reset,
        }

        fn step() -> impl Strategy<Value = Step> {
            prop_oneof![
                3 => Just(Step::Correct),
                2 => Just(Step::Wrong),
                3 => Just(Step::Tick),
                1 => Just(Step::Pause),
                1 => Just(Step::Resume),
                1 => Just(Step::Start),
                1 => Just(Step::Reset),
            ]
        }

        fn tier() -> impl Strategy<Value = Difficulty> {
            prop::sample::select(Difficulty::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn invariants_hold_under_any_command_sequence(
                seed in any::<u64>(),
                difficulty in tier(),
                steps in prop::collection::vec(step(), 0..200),
            ) {
                let mut session = Session::new(seed);
                session.set_difficulty(difficulty);
                let setting = difficulty.setting();

                for step in steps {
                    let time_before = session.time_left();
                    let score_before = session.score();
                    let round_before = session.round_index();
                    let playing = session.is_playing();

                    match step {
                        Step::Correct => {
                            if playing {
                                let value = correct_value(&session);
                                prop_assert_eq!(session.submit_answer(value), Some(true));
                                prop_assert_eq!(session.score(), score_before + CORRECT_REWARD);
                                prop_assert_eq!(session.round_index(), round_before + 1);
                            }
                        }
                        Step::Wrong => {
                            let verdict = session.submit_answer(WRONG);
                            if playing {
                                prop_assert_eq!(verdict, Some(false));
                                prop_assert_eq!(
                                    session.time_left(),
                                    time_before.saturating_sub(setting.miss_penalty)
                                );
                                prop_assert_eq!(session.round_index(), round_before + 1);
                            } else {
                                prop_assert_eq!(verdict, None);
                            }
                        }
                        Step::Tick => {
                            session.tick();
                            prop_assert!(session.time_left() <= time_before);
                        }
                        Step::Pause => session.pause(),
                        Step::Resume => session.resume(),
                        Step::Start => session.start(),
                        Step::Reset => {
                            session.reset();
                            prop_assert_eq!(session.score(), 0);
                            prop_assert_eq!(session.correct_count(), 0);
                            prop_assert_eq!(session.miss_count(), 0);
                            prop_assert!(!session.is_playing());
                            prop_assert_eq!(session.time_left(), setting.round_time_budget);
                        }
                    }

                    if session.is_playing() {
                        prop_assert_eq!(session.numbers().len(), setting.card_count);
                        prop_assert!(session.condition().is_some());
                    }
                    if session.phase() == Phase::Ended {
                        prop_assert_eq!(session.time_left(), 0);
                    }
                }
            }
        }
    }
}
