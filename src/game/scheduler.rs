use std::ops::ControlFlow;
use std::time::Duration;

pub type OnceCallback = Box<dyn FnOnce()>;
pub type RepeatingCallback = Box<dyn FnMut() -> ControlFlow<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Timed callbacks on the host's event-loop thread.
///
/// Callbacks never run concurrently with each other or with the code that
/// scheduled them. Once `cancel` returns, the timer will not fire again, even
/// when it is cancelled from inside its own callback.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerId;

    /// Runs `callback` every `period` until it returns `ControlFlow::Break`
    /// or the timer is cancelled.
    fn schedule_repeating(&self, period: Duration, callback: RepeatingCallback) -> TimerId;

    /// Returns false if the timer already fired (once) or was already cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}
