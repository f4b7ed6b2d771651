//! LED 2048 runner (default binary).
//!
//! Emulates the LED matrix in the terminal and the joystick on the keyboard.
//! With `TILT2048_TILT=1` the `wasd` keys also tilt a virtual accelerometer
//! that feeds the tilt joystick.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tilt_2048::engine::{SessionConfig, SessionController};
use tilt_2048::input::{
    EventQueue, KeyTracker, KeyboardInput, KeyboardJoystick, TiltConfig, TiltJoystick,
    VirtualTilt,
};
use tilt_2048::term::TerminalMatrix;
use tilt_2048::types::KEY_RELEASE_TIMEOUT_MS;
use tilt_2048::{env_flag, LOG_PATH_VAR, TILT_VAR};

fn main() -> Result<()> {
    init_logging()?;

    let mut config = SessionConfig::from_env();
    if std::env::var("TILT2048_SEED").is_err() {
        config.grid.seed = time_seed();
    }
    let tilt_config = TiltConfig::from_env();
    let tilt_enabled = env_flag(TILT_VAR);

    let games = run(config, tilt_config, tilt_enabled)?;
    tracing::info!(games, "exiting");
    Ok(())
}

/// The terminal belongs to the game, so logs only go to a file when asked.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var(LOG_PATH_VAR)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(config: SessionConfig, tilt_config: TiltConfig, tilt_enabled: bool) -> Result<u32> {
    let queue = EventQueue::new();
    let matrix = TerminalMatrix::enter()?;
    tracing::info!(
        key_release_events = matrix.key_release_events(),
        tilt = tilt_enabled,
        "terminal ready"
    );

    let virtual_tilt = tilt_enabled
        .then(|| VirtualTilt::new(Duration::from_millis(KEY_RELEASE_TIMEOUT_MS as u64)));
    let mut keyboard = KeyboardJoystick::spawn(KeyboardInput::new(
        queue.clone(),
        virtual_tilt.clone(),
        KeyTracker::default(),
    ));
    let mut tilt = virtual_tilt
        .map(|sensor| TiltJoystick::with_queue(sensor, tilt_config, queue.clone()));
    if let Some(tilt) = tilt.as_mut() {
        tilt.enable();
    }

    // Dropping the session on error restores the terminal.
    let mut session = SessionController::new(config, matrix, queue)?;
    let result = session.run();

    if let Some(tilt) = tilt.as_mut() {
        tilt.disable();
    }
    keyboard.shutdown();
    let (mut matrix, _) = session.into_parts();
    matrix.exit()?;
    result
}
