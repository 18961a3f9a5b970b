use log::trace;

/// Scores of won rounds, highest first.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    scores: Vec<i64>,
    capacity: Option<usize>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `capacity` entries, dropping the lowest.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            scores: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn record(&mut self, score: i64) {
        let position = self.scores.partition_point(|&existing| existing >= score);
        self.scores.insert(position, score);
        if let Some(capacity) = self.capacity {
            self.scores.truncate(capacity);
        }
        trace!(target: "leaderboard", "Recorded {} at rank {}", score, position + 1);
    }

    pub fn top_n(&self, n: usize) -> impl Iterator<Item = i64> + Clone + '_ {
        self.scores.iter().copied().take(n)
    }

    /// `(rank, score)` pairs with 1-based ranks.
    pub fn ranked(&self, n: usize) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.top_n(n).enumerate().map(|(i, score)| (i + 1, score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
