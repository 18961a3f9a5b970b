use log::{debug, info, trace, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use std::time::Duration;
use uuid::Uuid;

use super::countdown::Countdown;
use super::high_score::HighScore;
use super::leaderboard::Leaderboard;
use super::rng::SecretSource;
use super::round_history::RoundHistory;
use super::scheduler::{Scheduler, TimerId};
use super::session::GameSession;
use super::settings::Settings;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    Difficulty, GameCommand, GameError, GameEvent, RoundStats, SessionSnapshot, TickOutcome,
};

/// Where the controller is between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Welcome screen; no round exists.
    Idle,
    CountingDown,
    Playing,
    /// The last round ended; its result is in [`GameController::last_round`].
    Finished,
}

/// Owns the active round plus everything that outlives it (leaderboard,
/// high score, history) and is the only writer of round state.
///
/// Commands arrive through the command channel or [`GameController::dispatch`];
/// timer callbacks come from the [`Scheduler`]. Events produced while handling
/// either are queued and emitted after the controller is released, so view
/// listeners may query the controller or send new commands from inside a
/// listener. Events raised by such a nested command join the back of the
/// queue, so listeners always see them in the order they happened.
pub struct GameController {
    settings: Settings,
    difficulty: Difficulty,
    phase: Phase,
    session: Option<GameSession>,
    countdown: Option<Countdown>,
    // bumped whenever a round is started, replaced or quit; timer callbacks
    // carrying an older value are ignored
    round_generation: u64,
    playthrough_id: Uuid,
    timer: Option<TimerId>,
    leaderboard: Leaderboard,
    high_score: HighScore,
    history: RoundHistory,
    last_round: Option<RoundStats>,
    secret_source: Box<dyn SecretSource>,
    scheduler: Rc<dyn Scheduler>,
    event_emitter: EventEmitter<GameEvent>,
    pending_events: VecDeque<GameEvent>,
    // set while the outermost call drains `pending_events`
    emitting: bool,
    command_subscription: Option<Unsubscriber<GameCommand>>,
    self_ref: Weak<RefCell<GameController>>,
    debug_mode: bool,
}

impl Destroyable for GameController {
    fn destroy(&mut self) {
        self.stop_timer();
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        trace!(target: "game_controller", "Dropping GameController");
        self.stop_timer();
    }
}

impl GameController {
    pub fn new(
        command_observer: EventObserver<GameCommand>,
        event_emitter: EventEmitter<GameEvent>,
        scheduler: Rc<dyn Scheduler>,
        secret_source: Box<dyn SecretSource>,
        settings: Settings,
    ) -> Rc<RefCell<Self>> {
        let leaderboard = match settings.leaderboard_capacity {
            Some(capacity) => Leaderboard::with_capacity_limit(capacity),
            None => Leaderboard::new(),
        };
        let controller = Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                difficulty: settings.difficulty,
                settings,
                phase: Phase::Idle,
                session: None,
                countdown: None,
                round_generation: 0,
                playthrough_id: Uuid::new_v4(),
                timer: None,
                leaderboard,
                high_score: HighScore::new(),
                history: RoundHistory::new(),
                last_round: None,
                secret_source,
                scheduler,
                event_emitter,
                pending_events: VecDeque::new(),
                emitting: false,
                command_subscription: None,
                self_ref: self_ref.clone(),
                debug_mode: Settings::is_debug_mode(),
            })
        });
        GameController::wire_subscription(&controller, command_observer);
        controller
    }

    fn wire_subscription(
        controller: &Rc<RefCell<Self>>,
        command_observer: EventObserver<GameCommand>,
    ) {
        let handler = Rc::downgrade(controller);
        let subscription = command_observer.subscribe(move |command| {
            GameController::with_controller(&handler, |controller| {
                controller.handle_event(command)
            });
        });
        controller.borrow_mut().command_subscription = Some(subscription);
    }

    /// Handles `command` directly, bypassing the command channel.
    pub fn dispatch(controller: &Rc<RefCell<Self>>, command: GameCommand) {
        GameController::with_controller(&Rc::downgrade(controller), |controller| {
            controller.handle_command(command)
        });
    }

    /// Runs `f` against the controller, then emits whatever events it queued
    /// once the borrow has ended. A call made from inside a listener only
    /// queues; the outermost call drains the queue in FIFO order. Returns None
    /// if the controller is gone.
    fn with_controller<R>(
        controller: &Weak<RefCell<Self>>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Option<R> {
        let controller = controller.upgrade()?;
        let (result, emitter) = {
            let mut controller = controller.borrow_mut();
            let result = f(&mut *controller);
            if controller.emitting {
                return Some(result);
            }
            controller.emitting = true;
            (result, controller.event_emitter.clone())
        };
        loop {
            let next = controller.borrow_mut().pending_events.pop_front();
            let Some(event) = next else { break };
            emitter.emit(&event);
        }
        controller.borrow_mut().emitting = false;
        Some(result)
    }

    fn emit(&mut self, event: GameEvent) {
        self.pending_events.push_back(event);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Leaderboard truncated to the configured display limit.
    pub fn top_scores(&self) -> Vec<i64> {
        self.leaderboard
            .top_n(self.settings.leaderboard_display_limit)
            .collect()
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn last_round(&self) -> Option<&RoundStats> {
        self.last_round.as_ref()
    }

    pub fn session_snapshot(&self) -> Option<SessionSnapshot> {
        self.session.as_ref().map(GameSession::snapshot)
    }

    fn handle_command(&mut self, command: GameCommand) {
        trace!(target: "game_controller", "Handling command: {:?}", command);
        match command {
            GameCommand::ChooseDifficulty(difficulty) => self.choose_difficulty(difficulty),
            GameCommand::StartRound => self.start_round(),
            GameCommand::SubmitGuess(raw) => self.submit_guess(&raw),
            GameCommand::QuitRound => self.quit_round(),
        }
    }

    fn choose_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            self.difficulty = difficulty;
            self.emit(GameEvent::DifficultyChanged(difficulty));
        }
    }

    /// Stops any outstanding timer and forgets the current round.
    fn discard_round(&mut self) {
        self.stop_timer();
        self.countdown = None;
        self.session = None;
        self.round_generation += 1;
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            trace!(target: "game_controller", "Stopping timer {:?}", timer);
            self.scheduler.cancel(timer);
        }
    }

    fn is_round_live(&self) -> bool {
        matches!(self.phase, Phase::CountingDown | Phase::Playing)
    }

    fn start_round(&mut self) {
        if self.is_round_live() {
            info!(target: "game_controller", "Replacing the round in progress");
            self.emit(GameEvent::RoundCancelled);
        }
        self.discard_round();
        self.phase = Phase::CountingDown;
        self.countdown = Some(Countdown::new(self.settings.countdown_from));
        self.advance_countdown(self.round_generation);
    }

    fn advance_countdown(&mut self, generation: u64) {
        if generation != self.round_generation || self.phase != Phase::CountingDown {
            debug!(target: "game_controller", "Ignoring stale countdown callback");
            return;
        }
        self.timer = None;
        match self.countdown.as_mut().and_then(Iterator::next) {
            Some(step) => {
                self.emit(GameEvent::CountdownStep(step));
                let controller = self.self_ref.clone();
                self.timer = Some(self.scheduler.schedule_once(
                    self.settings.tick_interval(),
                    Box::new(move || {
                        GameController::with_controller(&controller, |controller| {
                            controller.advance_countdown(generation)
                        });
                    }),
                ));
            }
            None => self.begin_round(),
        }
    }

    fn begin_round(&mut self) {
        self.countdown = None;
        let session = GameSession::start(self.difficulty, self.secret_source.as_mut())
            .with_warning_threshold(self.settings.time_warning_threshold);
        self.playthrough_id = Uuid::new_v4();
        info!(
            target: "game_controller",
            "Round {} started on {:?}", self.playthrough_id, self.difficulty
        );
        if self.debug_mode {
            info!(target: "game_controller", "Secret number: {}", session.secret_number());
        }

        self.emit(GameEvent::RoundStarted {
            difficulty: session.difficulty(),
            attempts_left: session.attempts_left(),
            time_left: session.time_left(),
        });
        self.session = Some(session);
        self.phase = Phase::Playing;

        let generation = self.round_generation;
        let controller = self.self_ref.clone();
        self.timer = Some(self.scheduler.schedule_repeating(
            self.settings.tick_interval(),
            Box::new(move || {
                GameController::with_controller(&controller, |controller| {
                    controller.on_tick(generation)
                })
                .unwrap_or(ControlFlow::Break(()))
            }),
        ));
    }

    fn on_tick(&mut self, generation: u64) -> ControlFlow<()> {
        if generation != self.round_generation {
            debug!(target: "game_controller", "Ignoring tick from a replaced round");
            return ControlFlow::Break(());
        }
        let Some(session) = self.session.as_mut() else {
            return ControlFlow::Break(());
        };

        match session.tick() {
            Ok(TickOutcome::Running { time_left }) => {
                let warning = session.is_time_warning();
                self.emit(GameEvent::TimeChanged { time_left, warning });
                ControlFlow::Continue(())
            }
            Ok(TickOutcome::LostTime { .. }) => {
                self.emit(GameEvent::TimeChanged {
                    time_left: 0,
                    warning: false,
                });
                self.finish_round();
                ControlFlow::Break(())
            }
            Err(err) => {
                warn!(target: "game_controller", "Tick rejected: {}", err);
                ControlFlow::Break(())
            }
        }
    }

    fn submit_guess(&mut self, raw: &str) {
        let Some(session) = self.session.as_mut() else {
            debug!(target: "game_controller", "Ignoring guess {:?}: no round in progress", raw);
            return;
        };

        match session.submit_guess(raw) {
            Ok(outcome) => {
                let guess = session.last_guess().unwrap_or_default();
                let attempts_left = session.attempts_left();
                self.emit(GameEvent::GuessEvaluated {
                    guess,
                    attempts_left,
                    outcome,
                });
                if outcome.is_terminal() {
                    self.finish_round();
                }
            }
            Err(GameError::InvalidInput(reason)) => {
                debug!(target: "game_controller", "Rejected guess {:?}: {}", raw, reason);
                self.emit(GameEvent::GuessRejected(reason));
            }
            Err(err @ GameError::InvalidState(_)) => {
                warn!(target: "game_controller", "Guess rejected: {}", err);
            }
        }
    }

    fn finish_round(&mut self) {
        self.stop_timer();
        let Some(session) = self.session.take() else {
            return;
        };
        let status = session.status();
        let stats = RoundStats::new(
            self.playthrough_id,
            session.difficulty(),
            status,
            session.score(),
            session.secret_number(),
            session.attempts_used(),
            Duration::from_secs(u64::from(session.time_used())),
            chrono::Utc::now().timestamp(),
        );
        info!(
            target: "game_controller",
            "Round {} ended: {:?}, score {}", self.playthrough_id, status, stats.score
        );

        if status.is_win() {
            self.leaderboard.record(stats.score);
            if self.high_score.observe(stats.score) {
                self.emit(GameEvent::HighScoreChanged(self.high_score.current()));
            }
        }
        self.history.record_round(&stats);
        self.last_round = Some(stats.clone());
        self.phase = Phase::Finished;
        self.round_generation += 1;
        self.emit(GameEvent::RoundEnded(stats));
    }

    fn quit_round(&mut self) {
        match self.phase {
            Phase::CountingDown | Phase::Playing => {
                info!(target: "game_controller", "Round abandoned");
                self.discard_round();
                self.phase = Phase::Idle;
                self.emit(GameEvent::RoundCancelled);
            }
            Phase::Finished => self.phase = Phase::Idle,
            Phase::Idle => debug!(target: "game_controller", "Quit ignored: no round to leave"),
        }
    }
}

impl EventHandler<GameCommand> for GameController {
    fn handle_event(&mut self, event: &GameCommand) {
        self.handle_command(event.clone());
    }
}
