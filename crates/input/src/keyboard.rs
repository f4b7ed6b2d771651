//! Keyboard-emulated joystick for terminal environments.
//!
//! Produces the same pressed/held/released events as the physical joystick.
//! Terminals that report key release events are handled directly; for the
//! rest, a held middle key is recognised by its auto-repeat and released after
//! a timeout with no further key events.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::joystick::StopSignal;
use crate::map::{map_key, KeyBinding};
use crate::queue::EventQueue;
use crate::sensor::VirtualTilt;
use crate::types::{
    InputEvent, StickAction, StickDirection, JOYSTICK_HOLD_MS, KEY_RELEASE_TIMEOUT_MS,
};

/// How often the reader thread wakes up to check timeouts and stop requests.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Tracks which emulated stick position is held.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    held: Option<StickDirection>,
    last_key_time: Instant,
    release_timeout: Duration,
    hold_time: Duration,
}

impl KeyTracker {
    pub fn new(release_timeout: Duration, hold_time: Duration) -> Self {
        Self {
            held: None,
            last_key_time: Instant::now(),
            release_timeout,
            hold_time,
        }
    }

    pub fn held(&self) -> Option<StickDirection> {
        self.held
    }

    /// A key went down.
    ///
    /// Without release reporting, a second press of a held key is either
    /// auto-repeat or a fresh tap. Only the middle button has hold semantics,
    /// so a repeated direction is always a new tap.
    pub fn press(&mut self, direction: StickDirection, now: Instant) -> ArrayVec<InputEvent, 2> {
        let mut events = ArrayVec::new();
        self.last_key_time = now;
        match self.held {
            Some(held) if held == direction && direction == StickDirection::Middle => {
                events.push(InputEvent::at(now, direction, StickAction::Held));
            }
            Some(held) => {
                events.push(InputEvent::at(now, held, StickAction::Released));
                events.push(InputEvent::at(now, direction, StickAction::Pressed));
                self.held = Some(direction);
            }
            None => {
                events.push(InputEvent::at(now, direction, StickAction::Pressed));
                self.held = Some(direction);
            }
        }
        events
    }

    /// The terminal reported auto-repeat of a key it also reports releases for.
    pub fn repeat(&mut self, direction: StickDirection, now: Instant) -> ArrayVec<InputEvent, 2> {
        if self.held != Some(direction) {
            return self.press(direction, now);
        }
        self.last_key_time = now;
        let mut events = ArrayVec::new();
        events.push(InputEvent::at(now, direction, StickAction::Held));
        events
    }

    /// The key was reported released.
    pub fn release(&mut self, direction: StickDirection, now: Instant) -> Option<InputEvent> {
        if self.held != Some(direction) {
            return None;
        }
        self.held = None;
        Some(InputEvent::at(now, direction, StickAction::Released))
    }

    /// Emit a complete middle-button long press in one go.
    ///
    /// The held event is stamped just past the hold time after the press.
    pub fn long_press(&mut self, now: Instant) -> ArrayVec<InputEvent, 4> {
        let mut events = ArrayVec::new();
        if let Some(held) = self.held.take() {
            events.push(InputEvent::at(now, held, StickAction::Released));
        }
        let held_at = now + self.hold_time + Duration::from_millis(1);
        events.push(InputEvent::at(now, StickDirection::Middle, StickAction::Pressed));
        events.push(InputEvent::at(held_at, StickDirection::Middle, StickAction::Held));
        events.push(InputEvent::at(held_at, StickDirection::Middle, StickAction::Released));
        events
    }

    /// Synthesize a release once no key event arrived for the release timeout.
    pub fn expire(&mut self, now: Instant) -> Option<InputEvent> {
        let held = self.held?;
        if now.saturating_duration_since(self.last_key_time) <= self.release_timeout {
            return None;
        }
        self.held = None;
        Some(InputEvent::at(now, held, StickAction::Released))
    }

    pub fn reset(&mut self) {
        self.held = None;
        self.last_key_time = Instant::now();
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(KEY_RELEASE_TIMEOUT_MS as u64),
            Duration::from_millis(JOYSTICK_HOLD_MS as u64),
        )
    }
}

/// Translates key events into queue pushes and virtual tilt updates.
#[derive(Debug)]
pub struct KeyboardInput {
    queue: EventQueue,
    tilt: Option<VirtualTilt>,
    tracker: KeyTracker,
}

impl KeyboardInput {
    pub fn new(queue: EventQueue, tilt: Option<VirtualTilt>, tracker: KeyTracker) -> Self {
        Self {
            queue,
            tilt,
            tracker,
        }
    }

    /// Handle one key event. Returns false when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let Some(binding) = map_key(key) else {
            return true;
        };
        match binding {
            KeyBinding::Quit => {
                if key.kind == KeyEventKind::Release {
                    return true;
                }
                tracing::info!("quit requested");
                self.queue.close();
                return false;
            }
            KeyBinding::Stick(direction) => match key.kind {
                KeyEventKind::Press => {
                    for event in self.tracker.press(direction, now) {
                        self.queue.push(event);
                    }
                }
                KeyEventKind::Repeat => {
                    for event in self.tracker.repeat(direction, now) {
                        self.queue.push(event);
                    }
                }
                KeyEventKind::Release => {
                    if let Some(event) = self.tracker.release(direction, now) {
                        self.queue.push(event);
                    }
                }
            },
            KeyBinding::LongPress => {
                if key.kind == KeyEventKind::Press {
                    for event in self.tracker.long_press(now) {
                        self.queue.push(event);
                    }
                }
            }
            KeyBinding::Tilt(accel) => {
                if let Some(tilt) = &self.tilt {
                    match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => tilt.set(accel),
                        KeyEventKind::Release => tilt.level(),
                    }
                }
            }
        }
        true
    }

    /// Release a stale key if its timeout passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(event) = self.tracker.expire(now) {
            self.queue.push(event);
        }
    }
}

/// Background thread reading terminal key events.
pub struct KeyboardJoystick {
    stop: StopSignal,
    handle: Option<JoinHandle<()>>,
}

impl KeyboardJoystick {
    /// Start reading keys. The terminal should already be in raw mode.
    pub fn spawn(mut input: KeyboardInput) -> Self {
        let stop = StopSignal::new();
        let thread_stop = stop.clone();
        let handle = thread::spawn(move || {
            while !thread_stop.is_stopped() {
                match poll_key() {
                    Ok(Some(key)) => {
                        if !input.handle_key(key, Instant::now()) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::error!(error = %err, "terminal input failed");
                        input.queue.close();
                        break;
                    }
                }
                input.tick(Instant::now());
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the reader thread and wait for it.
    pub fn shutdown(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for KeyboardJoystick {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn poll_key() -> std::io::Result<Option<KeyEvent>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    fn tracker() -> KeyTracker {
        KeyTracker::new(Duration::from_millis(100), Duration::from_millis(500))
    }

    #[test]
    fn test_press_repeat_release() {
        let mut t = tracker();
        let now = Instant::now();

        let events = t.press(StickDirection::Middle, now);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, StickAction::Pressed);

        let events = t.press(StickDirection::Middle, now + Duration::from_millis(30));
        assert_eq!(events[0].action, StickAction::Held);

        let released = t.release(StickDirection::Middle, now + Duration::from_millis(60));
        assert_eq!(released.map(|e| e.action), Some(StickAction::Released));
        assert_eq!(t.held(), None);
    }

    #[test]
    fn test_repeated_direction_press_is_a_new_tap() {
        let queue = EventQueue::new();
        let mut input = KeyboardInput::new(queue.clone(), None, KeyTracker::default());
        let now = Instant::now();

        input.handle_key(key(KeyCode::Down, KeyEventKind::Press), now);
        input.handle_key(
            key(KeyCode::Down, KeyEventKind::Press),
            now + Duration::from_millis(400),
        );
        let actions: Vec<_> = queue
            .drain()
            .into_iter()
            .map(|e| (e.direction, e.action))
            .collect();
        assert_eq!(
            actions,
            vec![
                (StickDirection::Down, StickAction::Pressed),
                (StickDirection::Down, StickAction::Released),
                (StickDirection::Down, StickAction::Pressed),
            ]
        );
    }

    #[test]
    fn test_reported_repeat_holds_direction() {
        let mut t = tracker();
        let now = Instant::now();
        t.press(StickDirection::Left, now);
        let events = t.repeat(StickDirection::Left, now + Duration::from_millis(30));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, StickAction::Held);
        assert_eq!(t.held(), Some(StickDirection::Left));
    }

    #[test]
    fn test_switching_keys_releases_previous() {
        let mut t = tracker();
        let now = Instant::now();
        t.press(StickDirection::Left, now);
        let events = t.press(StickDirection::Up, now);
        assert_eq!(events[0].action, StickAction::Released);
        assert_eq!(events[0].direction, StickDirection::Left);
        assert_eq!(events[1].action, StickAction::Pressed);
        assert_eq!(events[1].direction, StickDirection::Up);
    }

    #[test]
    fn test_expire_releases_after_timeout_only() {
        let mut t = tracker();
        let now = Instant::now();
        t.press(StickDirection::Right, now);
        assert_eq!(t.expire(now + Duration::from_millis(50)), None);
        let released = t.expire(now + Duration::from_millis(150)).unwrap();
        assert_eq!(released.direction, StickDirection::Right);
        assert_eq!(released.action, StickAction::Released);
        assert_eq!(t.expire(now + Duration::from_millis(300)), None);
    }

    #[test]
    fn test_long_press_spans_hold_time() {
        let mut t = tracker();
        let now = Instant::now();
        let events = t.long_press(now);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].action, StickAction::Pressed);
        assert_eq!(events[1].action, StickAction::Held);
        assert!(events[1].timestamp - events[0].timestamp > Duration::from_millis(500));
    }

    #[test]
    fn test_keyboard_input_pushes_and_quits() {
        let queue = EventQueue::new();
        let mut input = KeyboardInput::new(queue.clone(), None, tracker());
        let now = Instant::now();

        assert!(input.handle_key(key(KeyCode::Left, KeyEventKind::Press), now));
        assert!(input.handle_key(key(KeyCode::Left, KeyEventKind::Release), now));
        let events = queue.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, StickAction::Released);

        assert!(!input.handle_key(key(KeyCode::Char('q'), KeyEventKind::Press), now));
        assert!(queue.is_closed());
    }

    #[test]
    fn test_tilt_keys_drive_virtual_tilt() {
        let queue = EventQueue::new();
        let tilt = VirtualTilt::new(Duration::from_secs(5));
        let mut input = KeyboardInput::new(queue.clone(), Some(tilt.clone()), tracker());

        input.handle_key(key(KeyCode::Char('d'), KeyEventKind::Press), Instant::now());
        assert!(tilt.current().x > 0.0);
        input.handle_key(key(KeyCode::Char('d'), KeyEventKind::Release), Instant::now());
        assert_eq!(tilt.current().x, 0.0);
        assert!(queue.is_empty());
    }
}
