//! Difficulty tiers and their pacing table
//!
//! Each tier fixes how many cards are dealt, how long a session lasts and how
//! many seconds a wrong pick costs. The table is static and read-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::condition::ConditionKind;
use crate::ParseError;

/// Pacing parameters for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySetting {
    /// Number of cards shown each round (always >= 2)
    pub card_count: usize,
    /// Session length in seconds
    pub round_time_budget: u32,
    /// Seconds removed from the clock on a wrong pick
    pub miss_penalty: u32,
}

/// Named difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Master,
}

const BEGINNER: DifficultySetting = DifficultySetting {
    card_count: 3,
    round_time_budget: 60,
    miss_penalty: 5,
};
const INTERMEDIATE: DifficultySetting = DifficultySetting {
    card_count: 4,
    round_time_budget: 60,
    miss_penalty: 5,
};
const ADVANCED: DifficultySetting = DifficultySetting {
    card_count: 5,
    round_time_budget: 50,
    miss_penalty: 8,
};
const MASTER: DifficultySetting = DifficultySetting {
    card_count: 6,
    round_time_budget: 45,
    miss_penalty: 10,
};

impl Difficulty {
    /// Every tier, easiest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Master,
    ];

    /// Pacing table lookup
    pub fn setting(self) -> DifficultySetting {
        match self {
            Difficulty::Beginner => BEGINNER,
            Difficulty::Intermediate => INTERMEDIATE,
            Difficulty::Advanced => ADVANCED,
            Difficulty::Master => MASTER,
        }
    }

    /// Condition kinds that may be drawn at this tier.
    ///
    /// `Memory` is listed here but is still subject to the per-round
    /// eligibility check in the condition generator.
    pub fn condition_kinds(self) -> &'static [ConditionKind] {
        use ConditionKind::*;
        match self {
            Difficulty::Beginner => &[Even, Odd],
            Difficulty::Intermediate => &[Even, Odd, Max, Min],
            Difficulty::Advanced | Difficulty::Master => &[Even, Odd, Max, Min, Memory],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "normal" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            "master" => Ok(Difficulty::Master),
            _ => Err(ParseError::UnknownDifficulty(s.to_string())),
        }
    }
}
