use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    InProgress,
    Won,
    LostAttempts,
    LostTime,
}

impl RoundStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundStatus::InProgress)
    }

    pub fn is_win(&self) -> bool {
        matches!(self, RoundStatus::Won)
    }
}
