//! Game engine
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM,
//! audio or storage:
//! - Seeded RNG only
//! - State changes only through `Session` commands
//! - Events are recorded, never acted upon

pub mod clock;
pub mod condition;
pub mod countdown;
pub mod difficulty;
pub mod evaluate;
pub mod numbers;
pub mod session;

pub use clock::SecondClock;
pub use condition::{Condition, ConditionKind, generate_condition};
pub use countdown::{Countdown, CountdownStep};
pub use difficulty::{Difficulty, DifficultySetting};
pub use evaluate::evaluate;
pub use numbers::{NumberSet, generate_numbers};
pub use session::{Command, GameEvent, Phase, Round, Session, SessionSnapshot};
