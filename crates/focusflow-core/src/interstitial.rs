//! Post-session mini-game: a coin flip shown after a segment completes.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn flip(rng: &mut dyn RandomSource) -> Self {
        if rng.index(2) == 0 {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }

    pub fn message(&self) -> String {
        let side = match self {
            CoinSide::Heads => "Heads",
            CoinSide::Tails => "Tails",
        };
        format!("It's {side}!")
    }
}
