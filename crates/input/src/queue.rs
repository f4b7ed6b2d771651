//! Thread-safe input event queue.
//!
//! Unbounded, any number of producers and consumers. Producers never block on
//! consumers. Consumers either block until an event arrives ([`EventQueue::wait`])
//! or drain whatever is queued right now ([`EventQueue::drain`]).
//!
//! Closing the queue wakes every blocked consumer; once a closed queue is
//! empty, `wait` returns `None`.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::types::InputEvent;

/// Anything the play loop can pull input events from.
pub trait EventSource {
    /// Block until the next event. `None` means the source is closed for good.
    fn wait_for_event(&mut self) -> Option<InputEvent>;

    /// Return all events queued since the last call, without waiting.
    fn get_events(&mut self) -> Vec<InputEvent>;

    /// Wait at most `timeout` for the next event.
    ///
    /// Sources without a timed wait block like [`wait_for_event`](Self::wait_for_event).
    fn poll_event(&mut self, timeout: Duration) -> Polled {
        let _ = timeout;
        match self.wait_for_event() {
            Some(event) => Polled::Event(event),
            None => Polled::Closed,
        }
    }
}

/// Result of a timed wait on an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    Event(InputEvent),
    Timeout,
    Closed,
}

#[derive(Debug, Default)]
struct QueueState {
    events: VecDeque<InputEvent>,
    closed: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<QueueState>,
    ready: Condvar,
}

/// Cloneable handle to a shared event queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Shared>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A panicking producer cannot leave the deque half-written.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an event. Returns false if the queue has been closed.
    pub fn push(&self, event: InputEvent) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.events.push_back(event);
        drop(state);
        self.inner.ready.notify_one();
        true
    }

    /// Block until an event is available. Returns `None` once closed and empty.
    pub fn wait(&self) -> Option<InputEvent> {
        let mut state = self.lock();
        loop {
            if let Some(event) = state.events.pop_front() {
                return Some(event);
            }
            if state.closed {
                return None;
            }
            state = self
                .inner
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`EventQueue::wait`] but gives up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<InputEvent> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if let Some(event) = state.events.pop_front() {
                return Some(event);
            }
            if state.closed {
                return None;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, _) = self
                .inner
                .ready
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    /// Take every queued event without blocking (possibly none).
    pub fn drain(&self) -> Vec<InputEvent> {
        self.lock().events.drain(..).collect()
    }

    /// Refuse further events and wake all waiting consumers.
    pub fn close(&self) {
        self.lock().closed = true;
        self.inner.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSource for EventQueue {
    fn wait_for_event(&mut self) -> Option<InputEvent> {
        self.wait()
    }

    fn get_events(&mut self) -> Vec<InputEvent> {
        self.drain()
    }

    fn poll_event(&mut self, timeout: Duration) -> Polled {
        match self.wait_timeout(timeout) {
            Some(event) => Polled::Event(event),
            None if self.is_closed() => Polled::Closed,
            None => Polled::Timeout,
        }
    }
}

/// A fixed sequence of events, handed out one at a time.
///
/// Every event is delivered by a wait, never by [`EventSource::get_events`],
/// so it behaves like a player who only acts when asked. Closed once the
/// script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    events: VecDeque<InputEvent>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedSource {
    fn wait_for_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    fn get_events(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}
