//! Decoding raw stick events into player actions.
//!
//! A directional press is a move. The middle button means two things: a
//! tap (released before the hold time) toggles brightness, a hold (still
//! down after the hold time) is undo.

use std::time::{Duration, Instant};

use crate::types::{InputEvent, PlayerAction, StickAction, StickDirection, JOYSTICK_HOLD_MS};

#[derive(Debug, Clone)]
pub struct ActionDecoder {
    hold_time: Duration,
    middle_hold_start: Option<Instant>,
}

impl ActionDecoder {
    pub fn new(hold_time: Duration) -> Self {
        Self {
            hold_time,
            middle_hold_start: None,
        }
    }

    pub fn hold_time(&self) -> Duration {
        self.hold_time
    }

    /// Forget any middle press in progress.
    pub fn reset(&mut self) {
        self.middle_hold_start = None;
    }

    /// Feed one event; returns an action once one is complete.
    pub fn feed(&mut self, event: InputEvent) -> Option<PlayerAction> {
        if event.action == StickAction::Pressed {
            if let Some(direction) = event.direction.direction() {
                return Some(PlayerAction::Move(direction));
            }
            self.middle_hold_start = Some(event.timestamp);
            return None;
        }

        let start = self.middle_hold_start?;
        if event.direction != StickDirection::Middle {
            return None;
        }
        match event.action {
            StickAction::Held if event.timestamp.saturating_duration_since(start) > self.hold_time => {
                self.middle_hold_start = None;
                Some(PlayerAction::Undo)
            }
            StickAction::Released => {
                self.middle_hold_start = None;
                Some(PlayerAction::Brightness)
            }
            _ => None,
        }
    }
}

impl Default for ActionDecoder {
    fn default() -> Self {
        Self::new(Duration::from_millis(JOYSTICK_HOLD_MS as u64))
    }
}
