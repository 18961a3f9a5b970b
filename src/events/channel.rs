use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

type Listeners<T> = RefCell<BTreeMap<SubscriptionId, Callback<T>>>;

/// Sending half of a [`Channel`]. Cheap to clone; every clone feeds the same listeners.
pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Receiving half of a [`Channel`].
pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Handle returned by [`EventObserver::subscribe`]. Dropping it keeps the
/// subscription alive; call [`Unsubscriber::unsubscribe`] to detach.
pub struct Unsubscriber<T: std::fmt::Debug> {
    id: SubscriptionId,
    listeners: Weak<Listeners<T>>,
}

impl<T: std::fmt::Debug> Unsubscriber<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns false when the listener was already gone (or the channel dropped).
    pub fn unsubscribe(self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => listeners.borrow_mut().remove(&self.id).is_some(),
            None => false,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Unsubscriber<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscriber").field("id", &self.id).finish()
    }
}

/// Single-threaded fan-out channel between the game core and its view.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<Listeners<T>>,
    next_id: Rc<Cell<SubscriptionId>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(Cell::new(0)),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        Unsubscriber {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    /// Delivers `data` to listeners in subscription order. The listener set is
    /// snapshotted first, so callbacks may subscribe or unsubscribe freely.
    pub fn emit(&self, data: &T) {
        let listeners: Vec<Callback<T>> = self.listeners.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", listeners.len(), data);
        for listener in listeners {
            listener(data);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: &T) {
        self.channel.emit(data);
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.channel.listener_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, GameCommand};

    #[test]
    fn test_commands_reach_every_listener_in_order() {
        let (emitter, observer) = Channel::<GameCommand>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = seen.clone();
            observer.subscribe(move |command: &GameCommand| {
                seen.borrow_mut().push(format!("{tag}:{command:?}"));
            });
        }

        emitter.emit(&GameCommand::ChooseDifficulty(Difficulty::Hard));
        assert_eq!(
            *seen.borrow(),
            vec!["first:ChooseDifficulty(Hard)", "second:ChooseDifficulty(Hard)"]
        );
    }

    #[test]
    fn test_clones_share_listeners() {
        let (emitter1, observer1) = Channel::<u32>::new();
        let emitter2 = emitter1.clone();
        let observer2 = observer1.clone();
        let total = Rc::new(Cell::new(0));

        let t = total.clone();
        observer1.subscribe(move |n: &u32| t.set(t.get() + n));
        emitter2.emit(&3);
        assert_eq!(total.get(), 3);

        let t = total.clone();
        observer2.subscribe(move |n: &u32| t.set(t.get() + n));
        emitter1.emit(&2);
        assert_eq!(total.get(), 7);
        assert_eq!(observer1.listener_count(), 2);
    }

    #[test]
    fn test_unsubscriber_detaches_listener() {
        let (emitter, observer) = Channel::<u32>::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = observer.subscribe(move |_| c.set(c.get() + 1));
        let id = handle.id();

        emitter.emit(&1);
        assert!(handle.unsubscribe());
        emitter.emit(&1);
        assert_eq!(count.get(), 1);
        assert!(!observer.unsubscribe(id));
    }

    #[test]
    fn test_listener_may_unsubscribe_during_emit() {
        let (emitter, observer) = Channel::<u32>::new();
        let count = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let handle = {
            let count = count.clone();
            let own_id = own_id.clone();
            let observer = observer.clone();
            observer.clone().subscribe(move |_| {
                count.set(count.get() + 1);
                if let Some(id) = own_id.get() {
                    observer.unsubscribe(id);
                }
            })
        };
        own_id.set(Some(handle.id()));

        emitter.emit(&0);
        emitter.emit(&0);
        assert_eq!(count.get(), 1);
        assert_eq!(observer.listener_count(), 0);
    }
}
