use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;
use uuid::Uuid;

use super::{Difficulty, RoundStatus};

/// Summary of one finished round.
#[serde_as]
#[readonly::make]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundStats {
    pub playthrough_id: Uuid,
    pub difficulty: Difficulty,
    pub status: RoundStatus,
    pub score: i64,
    pub secret_number: i64,
    pub attempts_used: u32,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub time_used: Duration,
    pub timestamp: i64,
}

impl RoundStats {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        playthrough_id: Uuid,
        difficulty: Difficulty,
        status: RoundStatus,
        score: i64,
        secret_number: i64,
        attempts_used: u32,
        time_used: Duration,
        timestamp: i64,
    ) -> Self {
        Self {
            playthrough_id,
            difficulty,
            status,
            score,
            secret_number,
            attempts_used,
            time_used,
            timestamp,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub difficulty: Difficulty,
    pub rounds_played: u32,
    pub rounds_won: u32,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub total_time_played: Duration,
    pub best_score: Option<i64>,
}
