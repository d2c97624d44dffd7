//! Round conditions
//!
//! A condition is a tagged value, not a closure: the variant names the rule and
//! carries whatever it needs (the extremal target, the remembered answer), so
//! it can be compared, logged and serialized. `check` is the pure predicate.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::numbers::NumberSet;
use crate::settings::Language;

/// Rule family, used to describe which rules a tier may draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Even,
    Odd,
    Max,
    Min,
    Memory,
}

impl ConditionKind {
    pub fn is_parity(self) -> bool {
        matches!(self, ConditionKind::Even | ConditionKind::Odd)
    }
}

/// A fully specified rule for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Any even card
    Even,
    /// Any odd card
    Odd,
    /// Any card equal to the board maximum
    Max { target: i32 },
    /// Any card equal to the board minimum
    Min { target: i32 },
    /// The card matching the previous correct answer
    Memory { previous: i32 },
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::Even => ConditionKind::Even,
            Condition::Odd => ConditionKind::Odd,
            Condition::Max { .. } => ConditionKind::Max,
            Condition::Min { .. } => ConditionKind::Min,
            Condition::Memory { .. } => ConditionKind::Memory,
        }
    }

    /// Stable identifier for presentation lookups
    pub fn id(&self) -> &'static str {
        match self {
            Condition::Even => "even",
            Condition::Odd => "odd",
            Condition::Max { .. } => "max",
            Condition::Min { .. } => "min",
            Condition::Memory { .. } => "memory",
        }
    }

    /// Whether `selected` satisfies this rule on `numbers`.
    ///
    /// Values that are not on the board never satisfy anything. Extremal rules
    /// compare by value, so every occurrence of a tied extreme is accepted.
    pub fn check(&self, selected: i32, numbers: &[i32]) -> bool {
        if !numbers.contains(&selected) {
            return false;
        }
        match *self {
            Condition::Even => selected % 2 == 0,
            Condition::Odd => selected % 2 != 0,
            Condition::Max { target } | Condition::Min { target } => selected == target,
            Condition::Memory { previous } => selected == previous,
        }
    }

    /// True if at least one card on the board satisfies the rule
    pub fn is_satisfiable(&self, numbers: &[i32]) -> bool {
        numbers.iter().any(|&n| self.check(n, numbers))
    }

    /// Default description (Japanese)
    pub fn description(&self) -> String {
        self.description_ja()
    }

    pub fn description_ja(&self) -> String {
        match self {
            Condition::Even => "偶数を選べ！".to_string(),
            Condition::Odd => "奇数を選べ！".to_string(),
            Condition::Max { .. } => "一番大きい数を選べ！".to_string(),
            Condition::Min { .. } => "一番小さい数を選べ！".to_string(),
            Condition::Memory { previous } => format!("前の正解と同じ数（{}）を選べ！", previous),
        }
    }

    pub fn description_en(&self) -> String {
        match self {
            Condition::Even => "Pick an EVEN number!".to_string(),
            Condition::Odd => "Pick an ODD number!".to_string(),
            Condition::Max { .. } => "Pick the LARGEST number!".to_string(),
            Condition::Min { .. } => "Pick the SMALLEST number!".to_string(),
            Condition::Memory { previous } => {
                format!("Pick your last correct answer ({})!", previous)
            }
        }
    }

    pub fn description_for(&self, language: Language) -> String {
        match language {
            Language::Ja => self.description_ja(),
            Language::En => self.description_en(),
        }
    }
}

/// Instantiate `kind` against the board, or `None` if it is not eligible.
fn instantiate(kind: ConditionKind, numbers: &NumberSet, previous: Option<i32>) -> Option<Condition> {
    match kind {
        ConditionKind::Even => numbers.has_even().then_some(Condition::Even),
        ConditionKind::Odd => numbers.has_odd().then_some(Condition::Odd),
        ConditionKind::Max => numbers.max_value().map(|target| Condition::Max { target }),
        ConditionKind::Min => numbers.min_value().map(|target| Condition::Min { target }),
        ConditionKind::Memory => previous
            .filter(|v| numbers.contains(v))
            .map(|previous| Condition::Memory { previous }),
    }
}

/// Parity of the first card; always satisfiable on a non-empty board.
fn fallback(numbers: &NumberSet) -> Condition {
    match numbers.first() {
        Some(n) if n % 2 != 0 => Condition::Odd,
        _ => Condition::Even,
    }
}

/// Pick a rule for this board from the kinds unlocked at `difficulty`.
///
/// `previous_correct` is the value answered correctly in the round before, if
/// any. The memory rule is only a candidate when that value is on the board.
pub fn generate_condition<R: Rng + ?Sized>(
    rng: &mut R,
    numbers: &NumberSet,
    difficulty: Difficulty,
    previous_correct: Option<i32>,
) -> Condition {
    let candidates: Vec<Condition> = difficulty
        .condition_kinds()
        .iter()
        .filter_map(|&kind| instantiate(kind, numbers, previous_correct))
        .collect();

    match candidates.choose(rng) {
        Some(&condition) => {
            log::debug!(
                "Condition {} from {} candidates on {:?}",
                condition.id(),
                candidates.len(),
                numbers.as_slice()
            );
            condition
        }
        None => {
            let condition = fallback(numbers);
            log::debug!("No eligible condition, falling back to {}", condition.id());
            condition
        }
    }
}
