/// Best won-round score seen by this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: i64,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `score` raised the maximum.
    pub fn observe(&mut self, score: i64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> i64 {
        self.best
    }
}
