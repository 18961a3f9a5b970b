mod countdown_step;
mod difficulty;
mod game_command;
mod game_error;
mod game_event;
mod guess;
mod round_stats;
mod round_status;
mod session_snapshot;

pub use countdown_step::CountdownStep;
pub use difficulty::{
    budget_for, Difficulty, UnknownDifficulty, TIME_LIMIT_EASY, TIME_LIMIT_HARD,
    TIME_LIMIT_MEDIUM,
};
pub use game_command::GameCommand;
pub use game_error::{GameError, InvalidInput};
pub use game_event::GameEvent;
pub use guess::{
    GuessOutcome, Hint, TickOutcome, MAX_ATTEMPTS, MAX_NUMBER, MIN_NUMBER, SCORE_PER_SECOND,
};
pub use round_stats::{GlobalStats, RoundStats};
pub use round_status::RoundStatus;
pub use session_snapshot::SessionSnapshot;
