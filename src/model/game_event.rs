use super::{CountdownStep, Difficulty, GuessOutcome, InvalidInput, RoundStats};

/// Notifications from the game controller to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    DifficultyChanged(Difficulty),
    CountdownStep(CountdownStep),
    RoundStarted {
        difficulty: Difficulty,
        attempts_left: u32,
        time_left: u32,
    },
    GuessRejected(InvalidInput),
    GuessEvaluated {
        guess: i64,
        attempts_left: u32,
        outcome: GuessOutcome,
    },
    TimeChanged {
        time_left: u32,
        warning: bool,
    },
    RoundEnded(RoundStats),
    RoundCancelled,
    HighScoreChanged(i64),
}
