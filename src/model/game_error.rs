use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::guess::{MAX_NUMBER, MIN_NUMBER};
use super::RoundStatus;

/// A guess the player typed that cannot be counted as an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvalidInput {
    #[error("The temple guardian growls: 'Offer a number, seeker!'")]
    NotANumber(String),
    #[error(
        "The temple guardian warns: 'Your offering must be between {} and {}.'",
        MIN_NUMBER,
        MAX_NUMBER
    )]
    OutOfRange(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("round is no longer in progress (status: {0:?})")]
    InvalidState(RoundStatus),
}
