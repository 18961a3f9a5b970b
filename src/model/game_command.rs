use super::Difficulty;

/// Intents forwarded from the view to the game controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    ChooseDifficulty(Difficulty),
    StartRound,
    SubmitGuess(String),
    QuitRound,
}
