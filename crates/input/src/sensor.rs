//! Accelerometer sources.
//!
//! The tilt joystick polls an [`Accelerometer`] from its worker thread. Values
//! are in g: a device lying flat reads roughly `(0, 0, 1)`, tilting it moves
//! gravity into the x and y components.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// One raw accelerometer sample, in g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const LEVEL: Acceleration = Acceleration {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Sample with only the tilt axes set
    pub const fn tilt(x: f32, y: f32) -> Self {
        Self { x, y, z: 1.0 }
    }
}

/// A raw two-axis (plus z) acceleration source.
pub trait Accelerometer: Send + 'static {
    fn read(&mut self) -> Acceleration;
}

/// Replays a fixed list of samples, then keeps returning the last one.
#[derive(Debug, Clone)]
pub struct ScriptedAccelerometer {
    samples: Vec<Acceleration>,
    next: usize,
}

impl ScriptedAccelerometer {
    pub fn new(samples: Vec<Acceleration>) -> Self {
        Self { samples, next: 0 }
    }

    /// `count` copies of `sample` appended to the script.
    pub fn then(mut self, sample: Acceleration, count: usize) -> Self {
        self.samples
            .extend(std::iter::repeat(sample).take(count));
        self
    }

    /// Samples not yet returned
    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.next)
    }
}

impl Accelerometer for ScriptedAccelerometer {
    fn read(&mut self) -> Acceleration {
        let sample = self
            .samples
            .get(self.next)
            .or_else(|| self.samples.last())
            .copied()
            .unwrap_or(Acceleration::LEVEL);
        if self.next < self.samples.len() {
            self.next += 1;
        }
        sample
    }
}

#[derive(Debug)]
struct TiltState {
    value: Acceleration,
    set_at: Instant,
}

/// A tilt vector written by the UI thread (keyboard) and read by the sensor thread.
///
/// Without a fresh write for `settle_after` the device "settles" back to level,
/// the same way a terminal key without release events is released by timeout.
#[derive(Debug, Clone)]
pub struct VirtualTilt {
    state: Arc<Mutex<TiltState>>,
    settle_after: Duration,
}

impl VirtualTilt {
    pub fn new(settle_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(TiltState {
                value: Acceleration::LEVEL,
                set_at: Instant::now(),
            })),
            settle_after,
        }
    }

    pub fn set(&self, value: Acceleration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.value = value;
        state.set_at = Instant::now();
    }

    pub fn level(&self) {
        self.set(Acceleration::LEVEL);
    }

    /// Current tilt, taking the settle timeout into account
    pub fn current(&self) -> Acceleration {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.set_at.elapsed() > self.settle_after {
            Acceleration::LEVEL
        } else {
            state.value
        }
    }
}

impl Accelerometer for VirtualTilt {
    fn read(&mut self) -> Acceleration {
        self.current()
    }
}
