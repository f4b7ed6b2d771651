//! Key mapping from terminal events to joystick positions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::sensor::Acceleration;
use crate::types::StickDirection;

/// Tilt applied by the virtual tilt keys (in g).
pub const VIRTUAL_TILT_G: f32 = 0.8;

/// What a key does on the emulated device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyBinding {
    /// A joystick position
    Stick(StickDirection),
    /// Press and hold the middle button long enough to count as a long press
    LongPress,
    /// Tilt the virtual device
    Tilt(Acceleration),
    /// Close the input queue
    Quit,
}

/// Map keyboard input to the emulated joystick and tilt sensor.
pub fn map_key(key: KeyEvent) -> Option<KeyBinding> {
    if should_quit(key) {
        return Some(KeyBinding::Quit);
    }
    let binding = match key.code {
        // Joystick
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            KeyBinding::Stick(StickDirection::Left)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            KeyBinding::Stick(StickDirection::Right)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            KeyBinding::Stick(StickDirection::Up)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            KeyBinding::Stick(StickDirection::Down)
        }
        KeyCode::Enter | KeyCode::Char(' ') => KeyBinding::Stick(StickDirection::Middle),
        KeyCode::Backspace | KeyCode::Char('u') | KeyCode::Char('U') => KeyBinding::LongPress,

        // Tilt
        KeyCode::Char('a') | KeyCode::Char('A') => {
            KeyBinding::Tilt(Acceleration::tilt(-VIRTUAL_TILT_G, 0.0))
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            KeyBinding::Tilt(Acceleration::tilt(VIRTUAL_TILT_G, 0.0))
        }
        KeyCode::Char('w') | KeyCode::Char('W') => {
            KeyBinding::Tilt(Acceleration::tilt(0.0, -VIRTUAL_TILT_G))
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            KeyBinding::Tilt(Acceleration::tilt(0.0, VIRTUAL_TILT_G))
        }

        _ => return None,
    };
    Some(binding)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_keys() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Left)),
            Some(KeyBinding::Stick(StickDirection::Left))
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('J'))),
            Some(KeyBinding::Stick(StickDirection::Down))
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Enter)),
            Some(KeyBinding::Stick(StickDirection::Middle))
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('u'))),
            Some(KeyBinding::LongPress)
        );
    }

    #[test]
    fn test_tilt_keys() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('a'))),
            Some(KeyBinding::Tilt(Acceleration::tilt(-VIRTUAL_TILT_G, 0.0)))
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('S'))),
            Some(KeyBinding::Tilt(Acceleration::tilt(0.0, VIRTUAL_TILT_G)))
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('q'))),
            Some(KeyBinding::Quit)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('x'))), None);
    }
}
