//! Number Judge entry point
//!
//! The web build is driven from JavaScript through `platform::web`. Natively
//! this runs a headless session with a simulated player, which is handy for
//! checking pacing and tier balance from the terminal.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clap::Parser;
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use number_judge::Game;
    use number_judge::settings::{GameOptions, Language};
    use number_judge::sim::{Difficulty, GameEvent, Phase};

    /// Frame length for the simulated loop, in seconds
    const FRAME_DT: f64 = 0.05;

    #[derive(Debug, Parser)]
    #[command(name = "number-judge", about = "Headless Number Judge session with a simulated player")]
    pub struct Args {
        /// beginner, intermediate, advanced or master
        #[arg(short, long, default_value = "beginner")]
        pub difficulty: Difficulty,

        /// RNG seed (random if omitted)
        #[arg(short, long)]
        pub seed: Option<u64>,

        /// Chance the simulated player picks a correct card (0.0 - 1.0)
        #[arg(short, long, default_value_t = 0.85)]
        pub accuracy: f64,

        /// Time the simulated player needs per pick, in milliseconds
        #[arg(short, long, default_value_t = 900)]
        pub reaction_ms: u64,

        /// Language for condition text (ja or en)
        #[arg(short, long, default_value = "en")]
        pub lang: Language,
    }

    /// Pick a card the way a player with the given accuracy would
    fn choose_card(game: &Game, rng: &mut Pcg32, accuracy: f64) -> Option<i32> {
        let round = game.session().round()?;
        let (right, wrong): (Vec<i32>, Vec<i32>) = round
            .numbers
            .iter()
            .partition(|&&n| round.condition.check(n, &round.numbers));

        let want_right = rng.random_bool(accuracy.clamp(0.0, 1.0));
        let pool = if want_right || wrong.is_empty() { &right } else { &wrong };
        pool.choose(rng).copied()
    }

    fn log_events(game: &mut Game) {
        for event in game.take_events() {
            match event {
                GameEvent::Correct { value, score } => log::info!("{} correct, score {}", value, score),
                GameEvent::Miss { value, time_left, .. } => {
                    log::info!("{} wrong, {}s left", value, time_left)
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    pub fn run(args: Args) {
        let seed = args.seed.unwrap_or_else(rand::random);
        let mut options = GameOptions::default();
        options.set_language(args.lang);

        let mut game = Game::new(seed, options);
        let mut player = Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
        let reaction = args.reaction_ms as f64 / 1000.0;
        let mut since_pick = 0.0;

        game.begin_countdown(args.difficulty);
        loop {
            game.update(FRAME_DT);

            log_events(&mut game);

            match game.session().phase() {
                Phase::Ended => break,
                Phase::Playing => {}
                _ => continue,
            }

            since_pick += FRAME_DT;
            if since_pick < reaction {
                continue;
            }
            since_pick = 0.0;

            if let Some(text) = game.condition_text() {
                log::info!("{:?} {}", game.session().numbers(), text);
            }
            if let Some(card) = choose_card(&game, &mut player, args.accuracy) {
                game.submit(card);
                log_events(&mut game);
            }
        }

        let session = game.session();
        println!("Difficulty: {}", session.difficulty());
        println!("Seed:       {}", session.seed());
        println!("Score:      {}", session.score());
        println!("Correct:    {}", session.correct_count());
        println!("Miss:       {}", session.miss_count());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Number Judge (native) starting...");
    headless::run(headless::Args::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
