//! Prints tilt events as they are detected.
//!
//! Drives the tilt joystick from a virtual accelerometer: hold `a`/`d` to
//! tilt left/right and `w`/`s` to tilt up/down. Stick keys are echoed too.
//! `q` quits. Logs go to stderr (`RUST_LOG` controls the level).

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tilt_2048::input::{
    EventQueue, KeyTracker, KeyboardInput, KeyboardJoystick, TiltConfig, TiltJoystick,
    VirtualTilt,
};
use tilt_2048::types::KEY_RELEASE_TIMEOUT_MS;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = TiltConfig::from_env();
    println!(
        "sensitivity {} hysteresis {} delay {} samples, poll {:?}",
        config.sensitivity, config.hysteresis, config.delay, config.poll_interval
    );
    println!("hold a/d/w/s to tilt, q to quit");

    terminal::enable_raw_mode()?;
    let result = monitor(config);
    terminal::disable_raw_mode()?;
    result
}

fn monitor(config: TiltConfig) -> Result<()> {
    let queue = EventQueue::new();
    let sensor = VirtualTilt::new(Duration::from_millis(KEY_RELEASE_TIMEOUT_MS as u64));
    let mut keyboard = KeyboardJoystick::spawn(KeyboardInput::new(
        queue.clone(),
        Some(sensor.clone()),
        KeyTracker::default(),
    ));
    let mut joystick = TiltJoystick::with_queue(sensor, config, queue);
    joystick.enable();

    let mut stdout = io::stdout();
    let start = std::time::Instant::now();
    while let Some(event) = joystick.wait_for_event() {
        let at = event.timestamp.saturating_duration_since(start);
        write!(
            stdout,
            "{:>8.3}s  {:<6} {}\r\n",
            at.as_secs_f32(),
            event.direction.as_str(),
            event.action.as_str()
        )?;
        stdout.flush()?;
    }

    joystick.disable();
    keyboard.shutdown();
    Ok(())
}
