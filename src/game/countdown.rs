use crate::model::CountdownStep;

/// Frames shown before a round starts: `from`, ..., 1, then "Begin!".
/// The host shows each frame for one tick interval.
#[derive(Debug, Clone)]
pub struct Countdown {
    next: Option<CountdownStep>,
}

impl Countdown {
    pub fn new(from: u8) -> Self {
        let first = if from == 0 {
            CountdownStep::Begin
        } else {
            CountdownStep::Count(from)
        };
        Self { next: Some(first) }
    }
}

impl Iterator for Countdown {
    type Item = CountdownStep;

    fn next(&mut self) -> Option<CountdownStep> {
        let current = self.next.take()?;
        self.next = match current {
            CountdownStep::Count(1) => Some(CountdownStep::Begin),
            CountdownStep::Count(n) => Some(CountdownStep::Count(n - 1)),
            CountdownStep::Begin => None,
        };
        Some(current)
    }
}
