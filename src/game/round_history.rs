use crate::model::{Difficulty, GlobalStats, RoundStats};
use std::collections::HashMap;

/// In-memory log of finished rounds, kept for the life of the process.
#[derive(Debug, Default)]
pub struct RoundHistory {
    rounds: Vec<RoundStats>,
    global_stats: HashMap<Difficulty, GlobalStats>,
}

impl RoundHistory {
    pub fn new() -> Self {
        let mut history = Self::default();
        for difficulty in Difficulty::all() {
            history.global_stats.insert(
                difficulty,
                GlobalStats {
                    difficulty,
                    ..Default::default()
                },
            );
        }
        history
    }

    pub fn record_round(&mut self, stats: &RoundStats) {
        self.rounds.push(stats.clone());

        let global_stats = self
            .global_stats
            .entry(stats.difficulty)
            .or_insert_with(|| GlobalStats {
                difficulty: stats.difficulty,
                ..Default::default()
            });
        global_stats.rounds_played += 1;
        global_stats.total_time_played += stats.time_used;
        if stats.status.is_win() {
            global_stats.rounds_won += 1;
            global_stats.best_score = Some(
                global_stats
                    .best_score
                    .map_or(stats.score, |best| best.max(stats.score)),
            );
        }
    }

    /// Most recent first.
    pub fn recent_rounds(&self, limit: usize) -> Vec<RoundStats> {
        self.rounds.iter().rev().take(limit).cloned().collect()
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }

    pub fn get_global_stats(&self, difficulty: Difficulty) -> GlobalStats {
        self.global_stats
            .get(&difficulty)
            .cloned()
            .unwrap_or_else(|| GlobalStats {
                difficulty,
                ..Default::default()
            })
    }
}
