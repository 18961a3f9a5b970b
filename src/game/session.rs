use log::{debug, trace};

use super::rng::SecretSource;
use crate::model::{
    Difficulty, GameError, GuessOutcome, Hint, InvalidInput, RoundStatus, SessionSnapshot,
    TickOutcome, MAX_ATTEMPTS, MAX_NUMBER, MIN_NUMBER, SCORE_PER_SECOND,
};

/// Seconds left at or below which the clock is shown as running out.
pub const TIME_WARNING_THRESHOLD: u32 = 10;

/// State of a single round. Created by [`GameSession::start`] and thrown away
/// once it reaches a terminal status.
#[derive(Debug, Clone)]
pub struct GameSession {
    difficulty: Difficulty,
    secret_number: i64,
    attempts_left: u32,
    time_left: u32,
    score: i64,
    last_guess: Option<i64>,
    last_hint: Option<Hint>,
    status: RoundStatus,
    warning_threshold: u32,
}

impl GameSession {
    pub fn start(difficulty: Difficulty, rng: &mut dyn SecretSource) -> Self {
        let secret_number = rng.draw(MIN_NUMBER, MAX_NUMBER);
        trace!(target: "game_session", "Drew secret {} for {:?}", secret_number, difficulty);
        Self {
            difficulty,
            secret_number,
            attempts_left: MAX_ATTEMPTS,
            time_left: difficulty.time_budget(),
            score: 0,
            last_guess: None,
            last_hint: None,
            status: RoundStatus::InProgress,
            warning_threshold: TIME_WARNING_THRESHOLD,
        }
    }

    pub fn with_warning_threshold(mut self, seconds: u32) -> Self {
        self.warning_threshold = seconds;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn secret_number(&self) -> i64 {
        self.secret_number
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub fn attempts_used(&self) -> u32 {
        MAX_ATTEMPTS - self.attempts_left
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn time_used(&self) -> u32 {
        self.difficulty.time_budget() - self.time_left
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn last_guess(&self) -> Option<i64> {
        self.last_guess
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_time_warning(&self) -> bool {
        !self.status.is_terminal() && self.time_left <= self.warning_threshold
    }

    /// Parses and range-checks raw guess text without touching the session.
    pub fn parse_guess(raw: &str) -> Result<i64, InvalidInput> {
        let guess = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidInput::NotANumber(raw.to_string()))?;
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&guess) {
            return Err(InvalidInput::OutOfRange(guess));
        }
        Ok(guess)
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::InvalidState(self.status));
        }
        Ok(())
    }

    /// Evaluates a guess. Rejected input consumes neither an attempt nor time.
    pub fn submit_guess(&mut self, raw: &str) -> Result<GuessOutcome, GameError> {
        self.ensure_in_progress()?;
        let guess = Self::parse_guess(raw)?;

        self.attempts_left -= 1;
        self.last_guess = Some(guess);

        if guess == self.secret_number {
            self.score = i64::from(self.time_left) * SCORE_PER_SECOND;
            self.status = RoundStatus::Won;
            self.last_hint = None;
            debug!(target: "game_session", "Guess {} correct; score {}", guess, self.score);
            return Ok(GuessOutcome::Won { score: self.score });
        }

        let hint = Hint::for_guess(guess, self.secret_number);
        self.last_hint = Some(hint);
        if self.attempts_left == 0 {
            self.status = RoundStatus::LostAttempts;
            debug!(target: "game_session", "Out of attempts; secret was {}", self.secret_number);
            return Ok(GuessOutcome::LostAttempts {
                secret: self.secret_number,
                score: self.score,
                hint,
            });
        }
        Ok(GuessOutcome::Continue(hint))
    }

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        self.ensure_in_progress()?;
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.status = RoundStatus::LostTime;
            debug!(target: "game_session", "Out of time; secret was {}", self.secret_number);
            return Ok(TickOutcome::LostTime {
                secret: self.secret_number,
                score: self.score,
            });
        }
        Ok(TickOutcome::Running {
            time_left: self.time_left,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            difficulty: self.difficulty,
            attempts_left: self.attempts_left,
            time_left: self.time_left,
            time_budget: self.difficulty.time_budget(),
            last_guess: self.last_guess,
            last_hint: self.last_hint,
            score: self.score,
            status: self.status,
            time_warning: self.is_time_warning(),
        }
    }
}
