use serde::{Deserialize, Serialize};

use super::{Difficulty, Hint, RoundStatus};

/// Everything a view needs to draw the guessing screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub difficulty: Difficulty,
    pub attempts_left: u32,
    pub time_left: u32,
    pub time_budget: u32,
    pub last_guess: Option<i64>,
    pub last_hint: Option<Hint>,
    pub score: i64,
    pub status: RoundStatus,
    pub time_warning: bool,
}
