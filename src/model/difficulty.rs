use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TIME_LIMIT_EASY: u32 = 60;
pub const TIME_LIMIT_MEDIUM: u32 = 45;
pub const TIME_LIMIT_HARD: u32 = 30;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> Vec<Difficulty> {
        vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Unknown indexes fall back to the default difficulty.
    pub fn from_index(index: usize) -> Difficulty {
        match index {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            2 => Difficulty::Hard,
            _ => Difficulty::default(),
        }
    }

    /// Seconds on the clock at the start of a round.
    pub fn time_budget(&self) -> u32 {
        match self {
            Difficulty::Easy => TIME_LIMIT_EASY,
            Difficulty::Medium => TIME_LIMIT_MEDIUM,
            Difficulty::Hard => TIME_LIMIT_HARD,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Label shown in the difficulty selector.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy (Novice Explorer)",
            Difficulty::Medium => "Medium (Ancient Path)",
            Difficulty::Hard => "Hard (Guardian's Trial)",
        }
    }
}

pub fn budget_for(level: Difficulty) -> u32 {
    level.time_budget()
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0:?}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    /// Accepts either the short name or the full selector label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Difficulty::all()
            .into_iter()
            .find(|d| {
                d.short_name().eq_ignore_ascii_case(wanted) || d.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_budgets() {
        assert_eq!(budget_for(Difficulty::Easy), 60);
        assert_eq!(budget_for(Difficulty::Medium), 45);
        assert_eq!(budget_for(Difficulty::Hard), 30);
        assert_eq!(Difficulty::default().time_budget(), 45);
    }

    #[test]
    fn test_index_round_trip_and_fallback() {
        for difficulty in Difficulty::all() {
            assert_eq!(Difficulty::from_index(difficulty.index()), difficulty);
        }
        assert_eq!(Difficulty::from_index(17), Difficulty::Medium);
    }

    #[test]
    fn test_parse_from_label_or_name() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "Easy (Novice Explorer)".parse::<Difficulty>(),
            Ok(Difficulty::Easy)
        );
        assert_eq!(
            "nightmare".parse::<Difficulty>(),
            Err(UnknownDifficulty("nightmare".to_string()))
        );
    }
}
