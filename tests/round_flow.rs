use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use forgotten_temple::events::Channel;
use forgotten_temple::game::{
    GameController, GameSession, ManualScheduler, Phase, ScriptedSource, Settings,
};
use forgotten_temple::model::{
    Difficulty, GameCommand, GameEvent, GuessOutcome, Hint, RoundStatus,
};

struct Table {
    controller: Rc<RefCell<GameController>>,
    scheduler: Rc<ManualScheduler>,
    events: Rc<RefCell<Vec<GameEvent>>>,
}

fn table(secrets: Vec<i64>, settings: Settings) -> Table {
    let (_commands, command_observer) = Channel::<GameCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEvent>::new();
    let scheduler = Rc::new(ManualScheduler::new());
    let controller = GameController::new(
        command_observer,
        event_emitter,
        scheduler.clone(),
        Box::new(ScriptedSource::new(secrets)),
        settings,
    );
    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = events.clone();
        event_observer.subscribe(move |event: &GameEvent| events.borrow_mut().push(event.clone()));
    }
    Table {
        controller,
        scheduler,
        events,
    }
}

#[test]
fn medium_round_with_mocked_secret() {
    let t = table(vec![10], Settings::default());
    GameController::dispatch(&t.controller, GameCommand::ChooseDifficulty(Difficulty::Medium));
    GameController::dispatch(&t.controller, GameCommand::StartRound);
    t.scheduler.advance(Duration::from_secs(4));
    assert_eq!(t.controller.borrow().phase(), Phase::Playing);

    GameController::dispatch(&t.controller, GameCommand::SubmitGuess("5".to_string()));
    let snapshot = t.controller.borrow().session_snapshot().unwrap();
    assert_eq!(snapshot.attempts_left, 3);
    assert_eq!(snapshot.last_hint, Some(Hint::Greater));
    let time_left = i64::from(snapshot.time_left);

    let previous_high = t.controller.borrow().high_score().current();
    GameController::dispatch(&t.controller, GameCommand::SubmitGuess("10".to_string()));

    let score = time_left * 10;
    assert!(t.events.borrow().contains(&GameEvent::GuessEvaluated {
        guess: 10,
        attempts_left: 2,
        outcome: GuessOutcome::Won { score },
    }));
    let controller = t.controller.borrow();
    assert_eq!(controller.last_round().map(|r| r.status), Some(RoundStatus::Won));
    assert!(controller.leaderboard().top_n(10).any(|s| s == score));
    assert_eq!(controller.high_score().current(), previous_high.max(score));
}

#[test]
fn every_difficulty_starts_with_its_budget() {
    for difficulty in Difficulty::all() {
        let session = GameSession::start(difficulty, &mut ScriptedSource::new([1]));
        assert_eq!(session.time_left(), difficulty.time_budget());
        assert_eq!(session.attempts_left(), 4);
        assert_eq!(session.status(), RoundStatus::InProgress);
    }
}

#[test]
fn faster_clock_and_short_countdown_from_settings() {
    let settings = Settings::from_json(
        r#"{"version": 2, "difficulty": "Hard", "countdown_from": 1, "tick_interval_ms": 100}"#,
    )
    .unwrap();
    let t = table(vec![42], settings);
    GameController::dispatch(&t.controller, GameCommand::StartRound);

    // "1", "Begin!", then the round
    t.scheduler.advance(Duration::from_millis(200));
    assert_eq!(t.controller.borrow().phase(), Phase::Playing);

    t.scheduler.advance(Duration::from_millis(3000));
    let controller = t.controller.borrow();
    assert_eq!(controller.phase(), Phase::Finished);
    assert_eq!(
        controller.last_round().map(|r| r.status),
        Some(RoundStatus::LostTime)
    );
    assert_eq!(controller.history().get_global_stats(Difficulty::Hard).rounds_played, 1);
    assert_eq!(t.scheduler.pending(), 0);
}
