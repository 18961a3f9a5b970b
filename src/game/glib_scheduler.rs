use glib::{timeout_add_local, timeout_add_local_once, SourceId};
use log::trace;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use super::scheduler::{OnceCallback, RepeatingCallback, Scheduler, TimerId};

/// Schedules timers on the thread-default GLib main context, for GTK hosts.
#[derive(Default)]
pub struct GlibScheduler {
    sources: Rc<RefCell<HashMap<TimerId, SourceId>>>,
    next_id: Cell<u64>,
}

impl GlibScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> TimerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TimerId::from_raw(id)
    }
}

impl Scheduler for GlibScheduler {
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerId {
        let id = self.next_id();
        let sources = Rc::clone(&self.sources);
        let source_id = timeout_add_local_once(delay, move || {
            sources.borrow_mut().remove(&id);
            callback();
        });
        self.sources.borrow_mut().insert(id, source_id);
        id
    }

    fn schedule_repeating(&self, period: Duration, mut callback: RepeatingCallback) -> TimerId {
        let id = self.next_id();
        let sources = Rc::clone(&self.sources);
        let source_id = timeout_add_local(period, move || match callback() {
            ControlFlow::Continue(()) => glib::ControlFlow::Continue,
            ControlFlow::Break(()) => {
                sources.borrow_mut().remove(&id);
                glib::ControlFlow::Break
            }
        });
        self.sources.borrow_mut().insert(id, source_id);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let source_id = self.sources.borrow_mut().remove(&id);
        match source_id {
            Some(source_id) => {
                trace!(target: "scheduler", "Removing glib source for {:?}", id);
                source_id.remove();
                true
            }
            None => false,
        }
    }
}

impl Drop for GlibScheduler {
    fn drop(&mut self) {
        for (_, source_id) in self.sources.borrow_mut().drain() {
            source_id.remove();
        }
    }
}
