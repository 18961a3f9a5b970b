use std::cell::RefCell;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use forgotten_temple::events::{Channel, EventHandler};
use forgotten_temple::game::{GameController, ManualScheduler, Phase, RandomSource, Settings};
use forgotten_temple::model::{
    Difficulty, GameCommand, GameEvent, RoundStatus, MAX_ATTEMPTS,
};
use forgotten_temple::Destroyable;
use itertools::Itertools;
use log::info;

const APP_TITLE: &str = "The Treasure of the Forgotten Temple";

const STORY: &str = "Deep within the jungle lies a forgotten temple, its treasures guarded by \
ancient riddles. Brave adventurer, can you decipher the secret number and claim the riches within?";

const ANCIENT_SCROLL: &str = "\
The Ancient Scroll
  Guess the secret number hidden within the temple walls (1 to 50).
  You have limited torches (attempts) and time. The quicker you solve the
  riddle, the greater your reward. Listen to the temple's whispers for guidance.

  easy | medium | hard   choose your path
  start                  enter the temple (or attempt another riddle)
  <number>               make an offering
  quit                   leave the temple
  board                  the Hall of Legendary Explorers
  history                your most recent expeditions
  help                   read this scroll again
  exit                   close the game";

/// Line-oriented stand-in for the themed window.
struct ConsoleView;

impl ConsoleView {
    fn say(&self, text: &str) {
        println!("{text}");
    }
}

impl EventHandler<GameEvent> for ConsoleView {
    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::DifficultyChanged(difficulty) => {
                self.say(&format!("Path chosen: {difficulty}"))
            }
            GameEvent::CountdownStep(step) => self.say(&step.to_string()),
            GameEvent::RoundStarted {
                attempts_left,
                time_left,
                ..
            } => self.say(&format!(
                "Torches remaining: {attempts_left} | Time remaining: {time_left}s"
            )),
            GameEvent::GuessRejected(reason) => self.say(&reason.to_string()),
            GameEvent::GuessEvaluated {
                guess,
                attempts_left,
                outcome,
            } => {
                self.say(&format!(
                    "Last offering: {guess} | Torches remaining: {attempts_left}"
                ));
                if let Some(hint) = outcome.hint() {
                    self.say(&hint.to_string());
                }
            }
            GameEvent::TimeChanged { time_left, warning } => {
                if *warning || time_left % 10 == 0 {
                    let marker = if *warning { "!" } else { "" };
                    self.say(&format!("Time remaining: {time_left}s{marker}"));
                }
            }
            GameEvent::RoundEnded(stats) => {
                let verdict = match stats.status {
                    RoundStatus::Won => {
                        "The ancient door creaks open, revealing the treasure chamber!".to_string()
                    }
                    RoundStatus::LostAttempts => format!(
                        "The temple guardian speaks: 'Your quest has failed. The sacred number was {}.'",
                        stats.secret_number
                    ),
                    RoundStatus::LostTime => format!(
                        "Time has run out! The temple doors slam shut. The sacred number was: {}",
                        stats.secret_number
                    ),
                    RoundStatus::InProgress => String::new(),
                };
                self.say(&verdict);
                self.say(&format!("Treasure value: {}", stats.score));
                self.say("Type 'start' to attempt another riddle or 'quit' to leave the temple.");
            }
            GameEvent::RoundCancelled => self.say("You retreat from the temple."),
            GameEvent::HighScoreChanged(score) => self.say(&format!("Highest Score: {score}")),
        }
    }
}

enum Input {
    Command(GameCommand),
    Leaderboard,
    History,
    Help,
    Exit,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if let Ok(difficulty) = line.parse::<Difficulty>() {
        return Input::Command(GameCommand::ChooseDifficulty(difficulty));
    }
    match line.to_ascii_lowercase().as_str() {
        "start" | "play" | "retry" => Input::Command(GameCommand::StartRound),
        "quit" | "leave" => Input::Command(GameCommand::QuitRound),
        "board" | "hall" => Input::Leaderboard,
        "history" | "journal" => Input::History,
        "help" | "scroll" => Input::Help,
        "exit" => Input::Exit,
        _ if line.chars().any(|c| c.is_ascii_digit()) || line.starts_with('-') => {
            Input::Command(GameCommand::SubmitGuess(line.to_string()))
        }
        _ => Input::Unknown(line.to_string()),
    }
}

fn render_leaderboard(controller: &GameController) -> String {
    let limit = controller.settings().leaderboard_display_limit;
    let entries = controller
        .leaderboard()
        .ranked(limit)
        .map(|(rank, score)| format!("{rank}. {score}"))
        .join("\n");
    if entries.is_empty() {
        "Hall of Legendary Explorers\n(no explorers yet)".to_string()
    } else {
        format!("Hall of Legendary Explorers\n{entries}")
    }
}

fn render_history(controller: &GameController) -> String {
    let limit = controller.settings().leaderboard_display_limit;
    let rounds = controller
        .history()
        .recent_rounds(limit)
        .iter()
        .map(|round| {
            format!(
                "{} | {:?} | number {} | {} torches | {}s | treasure {}",
                round.difficulty.short_name(),
                round.status,
                round.secret_number,
                round.attempts_used,
                round.time_used.as_secs(),
                round.score
            )
        })
        .join("\n");
    if rounds.is_empty() {
        "Expedition Journal\n(no expeditions yet)".to_string()
    } else {
        format!("Expedition Journal\n{rounds}")
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings = Settings::load();
    let scheduler = Rc::new(ManualScheduler::new());
    let (command_emitter, command_observer) = Channel::<GameCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEvent>::new();
    let controller = GameController::new(
        command_observer,
        event_emitter,
        scheduler.clone(),
        Box::new(RandomSource::new(Settings::seed_from_env())),
        settings,
    );

    let view = Rc::new(RefCell::new(ConsoleView));
    let _view_subscription = {
        let view = Rc::clone(&view);
        event_observer.subscribe(move |event| view.borrow_mut().handle_event(event))
    };

    println!("{APP_TITLE}\n\n{STORY}\n");
    println!(
        "Highest Score: {} | Path: {} | Torches per riddle: {}",
        controller.borrow().high_score().current(),
        controller.borrow().difficulty(),
        MAX_ATTEMPTS
    );
    println!("Type 'help' to read the Ancient Scroll.");
    io::stdout().flush()?;

    // stdin is read on its own thread; every game callback runs here
    let lines = spawn_stdin_reader();
    let mut last_advance = Instant::now();
    loop {
        let wait = scheduler
            .next_deadline()
            .unwrap_or(Duration::from_secs(3600));
        let received = lines.recv_timeout(wait);

        let now = Instant::now();
        scheduler.advance(now.duration_since(last_advance));
        last_advance = now;

        match received {
            Ok(line) => match parse_line(&line) {
                Input::Command(command) => command_emitter.emit(&command),
                Input::Leaderboard => println!("{}", render_leaderboard(&controller.borrow())),
                Input::History => println!("{}", render_history(&controller.borrow())),
                Input::Help => println!("{ANCIENT_SCROLL}"),
                Input::Exit => break,
                Input::Unknown(text) if text.is_empty() => (),
                Input::Unknown(text) if controller.borrow().phase() == Phase::Playing => {
                    command_emitter.emit(&GameCommand::SubmitGuess(text))
                }
                Input::Unknown(text) => println!("The temple does not understand {text:?}."),
            },
            Err(RecvTimeoutError::Timeout) => (),
            Err(RecvTimeoutError::Disconnected) => break,
        }
        io::stdout().flush()?;
    }

    info!(target: "main", "Leaving the temple");
    controller.borrow_mut().destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert!(matches!(
            parse_line(" Hard "),
            Input::Command(GameCommand::ChooseDifficulty(Difficulty::Hard))
        ));
        assert!(matches!(parse_line("history"), Input::History));
        assert!(matches!(parse_line("board"), Input::Leaderboard));
        assert!(matches!(
            parse_line("17"),
            Input::Command(GameCommand::SubmitGuess(raw)) if raw == "17"
        ));
        assert!(matches!(parse_line("seventeen"), Input::Unknown(text) if text == "seventeen"));
    }
}
