//! Card values dealt each round

use std::ops::Deref;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_CARD_COUNT, NUMBER_MAX, NUMBER_MIN};

/// Ordered card values for one round, in presentation order.
///
/// Values may repeat. There is no mutable access; a new round builds a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberSet(Vec<i32>);

impl NumberSet {
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Largest value on the board
    pub fn max_value(&self) -> Option<i32> {
        self.0.iter().copied().max()
    }

    /// Smallest value on the board
    pub fn min_value(&self) -> Option<i32> {
        self.0.iter().copied().min()
    }

    pub fn has_even(&self) -> bool {
        self.0.iter().any(|n| n % 2 == 0)
    }

    pub fn has_odd(&self) -> bool {
        self.0.iter().any(|n| n % 2 != 0)
    }
}

impl Deref for NumberSet {
    type Target = [i32];

    fn deref(&self) -> &[i32] {
        &self.0
    }
}

impl From<Vec<i32>> for NumberSet {
    fn from(values: Vec<i32>) -> Self {
        Self(values)
    }
}

/// Deal `count` independent values from `NUMBER_MIN..=NUMBER_MAX`.
///
/// Counts below `MIN_CARD_COUNT` are raised to it.
pub fn generate_numbers<R: Rng + ?Sized>(rng: &mut R, count: usize) -> NumberSet {
    let count = if count < MIN_CARD_COUNT {
        log::warn!("Card count {} below minimum, using {}", count, MIN_CARD_COUNT);
        MIN_CARD_COUNT
    } else {
        count
    };

    let values = (0..count)
        .map(|_| rng.random_range(NUMBER_MIN..=NUMBER_MAX))
        .collect();
    NumberSet(values)
}
