use log::trace;
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::time::Duration;

use super::scheduler::{OnceCallback, RepeatingCallback, Scheduler, TimerId};

const MIN_PERIOD: Duration = Duration::from_millis(1);

enum Task {
    Once(OnceCallback),
    Repeating {
        period: Duration,
        callback: RepeatingCallback,
    },
}

struct Entry {
    id: TimerId,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct State {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
    running: Option<TimerId>,
    running_cancelled: bool,
}

/// Scheduler driven by an explicit virtual clock. Nothing fires until
/// [`ManualScheduler::advance`] moves time forward, which makes it suitable
/// both for tests and for hosts that run their own event loop.
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<State>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.entries.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Time until the earliest pending timer is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        let state = self.state.borrow();
        state
            .entries
            .iter()
            .map(|entry| entry.due.saturating_sub(state.now))
            .min()
    }

    /// Moves the clock forward by `by`, firing every timer that comes due in
    /// deadline order (ties in scheduling order). Timers scheduled by a
    /// callback fire in the same call if they fall inside the window.
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now + by;
        let mut fired = 0;

        while let Some(entry) = self.pop_due(target) {
            fired += 1;
            match entry.task {
                Task::Once(callback) => callback(),
                Task::Repeating {
                    period,
                    mut callback,
                } => {
                    let flow = callback();
                    let mut state = self.state.borrow_mut();
                    if flow == ControlFlow::Continue(()) && !state.running_cancelled {
                        state.entries.push(Entry {
                            id: entry.id,
                            due: entry.due + period,
                            task: Task::Repeating { period, callback },
                        });
                    }
                }
            }
            let mut state = self.state.borrow_mut();
            state.running = None;
            state.running_cancelled = false;
        }

        self.state.borrow_mut().now = target;
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<Entry> {
        let mut state = self.state.borrow_mut();
        let index = state
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;
        let entry = state.entries.remove(index);
        state.now = entry.due;
        state.running = Some(entry.id);
        state.running_cancelled = false;
        trace!(target: "scheduler", "Firing timer {:?} at {:?}", entry.id, entry.due);
        Some(entry)
    }

    fn insert(&self, delay: Duration, task: Task) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId::from_raw(state.next_id);
        state.next_id += 1;
        let due = state.now + delay;
        state.entries.push(Entry { id, due, task });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerId {
        self.insert(delay, Task::Once(callback))
    }

    fn schedule_repeating(&self, period: Duration, callback: RepeatingCallback) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(period, Task::Repeating { period, callback })
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut state = self.state.borrow_mut();
        if let Some(index) = state.entries.iter().position(|entry| entry.id == id) {
            state.entries.remove(index);
            return true;
        }
        if state.running == Some(id) && !state.running_cancelled {
            state.running_cancelled = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn log_entry(log: &Rc<RefCell<Vec<String>>>, text: &str) -> OnceCallback {
        let log = log.clone();
        let text = text.to_string();
        Box::new(move || log.borrow_mut().push(text))
    }

    #[test]
    fn test_nothing_fires_before_its_deadline() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule_once(Duration::from_secs(2), log_entry(&log, "two"));

        assert_eq!(scheduler.advance(Duration::from_millis(1999)), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(1)));
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(*log.borrow(), vec!["two"]);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_fires_in_deadline_then_scheduling_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule_once(Duration::from_secs(3), log_entry(&log, "c"));
        scheduler.schedule_once(Duration::from_secs(1), log_entry(&log, "a"));
        scheduler.schedule_once(Duration::from_secs(1), log_entry(&log, "b"));

        scheduler.advance(Duration::from_secs(5));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), Duration::from_secs(5));
    }

    #[test]
    fn test_repeating_until_break() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        scheduler.schedule_repeating(
            Duration::from_secs(1),
            Box::new(move || {
                c.set(c.get() + 1);
                if c.get() == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_secs(10)), 3);
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_pending_timer() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = scheduler.schedule_once(Duration::from_secs(1), log_entry(&log, "never"));

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance(Duration::from_secs(2));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_repeating_timer_cancelled_from_its_own_callback() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));

        let id = {
            let scheduler_ref = Rc::downgrade(&scheduler);
            let count = count.clone();
            let own_id = own_id.clone();
            scheduler.schedule_repeating(
                Duration::from_secs(1),
                Box::new(move || {
                    count.set(count.get() + 1);
                    if let (Some(scheduler), Some(id)) = (scheduler_ref.upgrade(), own_id.get()) {
                        assert!(scheduler.cancel(id));
                    }
                    ControlFlow::Continue(())
                }),
            )
        };
        own_id.set(Some(id));

        scheduler.advance(Duration::from_secs(5));
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_callbacks_can_chain_new_timers() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let weak = Rc::downgrade(&scheduler);
            let log = log.clone();
            scheduler.schedule_once(
                Duration::from_secs(1),
                Box::new(move || {
                    log.borrow_mut().push("first".to_string());
                    if let Some(scheduler) = weak.upgrade() {
                        scheduler.schedule_once(Duration::from_secs(1), log_entry(&log, "second"));
                    }
                }),
            );
        }

        scheduler.advance(Duration::from_millis(1500));
        assert_eq!(*log.borrow(), vec!["first"]);
        scheduler.advance(Duration::from_millis(500));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }
}
