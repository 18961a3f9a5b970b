use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest secret number and smallest accepted guess.
pub const MIN_NUMBER: i64 = 1;
/// Largest secret number and largest accepted guess.
pub const MAX_NUMBER: i64 = 50;
pub const MAX_ATTEMPTS: u32 = 4;
/// Points awarded per second left on the clock when the secret is found.
pub const SCORE_PER_SECOND: i64 = 10;

/// Which way the secret lies relative to the last wrong guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    Greater,
    Lesser,
}

impl Hint {
    pub fn for_guess(guess: i64, secret: i64) -> Hint {
        if guess < secret {
            Hint::Greater
        } else {
            Hint::Lesser
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Hint::Greater => "The temple whispers: 'The sacred number is greater.'",
            Hint::Lesser => "The temple whispers: 'The sacred number is lesser.'",
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessOutcome {
    Continue(Hint),
    Won { score: i64 },
    /// The last torch went out; the hint for the final guess is still reported.
    LostAttempts { secret: i64, score: i64, hint: Hint },
}

impl GuessOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GuessOutcome::Continue(_))
    }

    pub fn hint(&self) -> Option<Hint> {
        match self {
            GuessOutcome::Continue(hint) | GuessOutcome::LostAttempts { hint, .. } => Some(*hint),
            GuessOutcome::Won { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Running { time_left: u32 },
    LostTime { secret: i64, score: i64 },
}
