//! Play loop tests against an in-memory LED matrix.

use std::thread;
use std::time::{Duration, Instant};

use tilt_2048::core::{Grid, GridConfig};
use tilt_2048::engine::{SessionConfig, SessionController};
use tilt_2048::input::{
    Acceleration, ScriptedAccelerometer, ScriptedSource, TiltConfig, TiltJoystick,
};
use tilt_2048::term::{LedMatrix, MemoryMatrix};
use tilt_2048::types::{InputEvent, StickAction, StickDirection};

fn config(grid: GridConfig) -> SessionConfig {
    SessionConfig {
        grid,
        ..SessionConfig::default()
    }
    .instant()
}

fn press(direction: StickDirection) -> InputEvent {
    InputEvent::pressed(direction)
}

#[test]
fn run_dispatches_moves_brightness_and_undo() {
    let t0 = Instant::now();
    let script = ScriptedSource::new([
        press(StickDirection::Left),
        press(StickDirection::Right),
        InputEvent::at(t0, StickDirection::Middle, StickAction::Pressed),
        InputEvent::at(t0 + Duration::from_millis(80), StickDirection::Middle, StickAction::Released),
        InputEvent::at(t0, StickDirection::Middle, StickAction::Pressed),
        InputEvent::at(t0 + Duration::from_millis(600), StickDirection::Middle, StickAction::Held),
        InputEvent::at(t0 + Duration::from_millis(650), StickDirection::Middle, StickAction::Released),
    ]);
    let mut session =
        SessionController::new(config(GridConfig::new(5)), MemoryMatrix::new(), script).unwrap();

    let games = session.run().unwrap();
    assert_eq!(games, 0);
    // Left and Right both move without merging; undo takes Right back.
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.engine().score(), 0);
    let after_left = Grid::from_rows(&[
        [0, 0, 0, 0],
        [0, 4, 0, 0],
        [2, 0, 0, 0],
        [2, 0, 0, 0],
    ])
    .unwrap();
    assert_eq!(session.engine().tiles(), after_left);
    assert!(session.matrix().low_light());
    assert_eq!(session.matrix().last_status(), Some("Score: 0"));

    let (matrix, script) = session.into_parts();
    assert_eq!(script.remaining(), 0);
    assert!(matrix.frames_drawn() > 0);
}

#[test]
fn stuck_board_ends_and_restarts_on_any_input() {
    // A 1x1 board is full after its first tile and can never move.
    let grid = GridConfig::new(3).with_size(1).with_initial_tiles(1);
    let script = ScriptedSource::new([press(StickDirection::Down)]);
    let mut session = SessionController::new(config(grid), MemoryMatrix::new(), script).unwrap();

    let games = session.run().unwrap();
    assert_eq!(games, 2);
    let messages = session.matrix().messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].0.starts_with("Best tile: "));
    assert!(!session.engine().has_moves());
}

#[test]
fn tilt_joystick_drives_the_session() {
    let sensor = ScriptedAccelerometer::new(Vec::new())
        .then(Acceleration::LEVEL, 60)
        .then(Acceleration::tilt(-0.9, 0.0), 30)
        .then(Acceleration::LEVEL, 1);
    let tilt = TiltConfig::new(0.4, 0.2, 10)
        .unwrap()
        .with_poll_interval(Duration::from_millis(1));
    let mut joystick = TiltJoystick::new(sensor, tilt);
    let queue = joystick.queue();
    joystick.enable();

    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(600));
        queue.close();
    });

    let grid = GridConfig::new(8).with_size(1).with_initial_tiles(1);
    let mut session = SessionController::new(config(grid), MemoryMatrix::new(), joystick).unwrap();
    let games = session.run().unwrap();
    closer.join().unwrap();

    // First game over, tilt left starts the second, closing ends it.
    assert_eq!(games, 2);
    let (_, mut joystick) = session.into_parts();
    joystick.disable();
}
