//! Observed state with explicit change notification
//!
//! UI layers subscribe to the cells they draw (streak, high score, music
//! toggle) and get called back only when the value actually changes.

use std::fmt;

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A value plus the listeners interested in it
pub struct Observable<T> {
    value: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store a new value; listeners run only if it differs from the old one.
    /// Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
        true
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Session stats the UI watches
#[derive(Debug)]
pub struct Stats {
    pub streak: Observable<u32>,
    pub high_score: Observable<u32>,
    pub music_enabled: Observable<bool>,
}

impl Stats {
    pub fn new(high_score: u32, music_enabled: bool) -> Self {
        Self {
            streak: Observable::new(0),
            high_score: Observable::new(high_score),
            music_enabled: Observable::new(music_enabled),
        }
    }
}
