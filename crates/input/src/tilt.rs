//! Tilt classification with hysteresis and debounce.
//!
//! Each axis is classified independently on every sample:
//!
//! - above `sensitivity`: positive; below `-sensitivity`: negative
//! - within `sensitivity - hysteresis` of level: neutral
//! - anywhere in between: unchanged (dead zone, prevents chatter at the threshold)
//!
//! A classification only becomes *stable* after it has been seen for `delay`
//! consecutive samples. A stable change emits `released` for the old direction
//! (if any) followed by `pressed` for the new one (if any).

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use crate::sensor::Acceleration;
use crate::types::{
    Direction, InputEvent, StickAction, TILT_DELAY_SAMPLES, TILT_HYSTERESIS, TILT_POLL_MS,
    TILT_SENSITIVITY,
};

/// Invalid tilt tuning.
#[derive(Debug, Clone, PartialEq)]
pub enum TiltConfigError {
    /// Sensitivity must be a positive, finite number.
    Sensitivity(f32),
    /// Hysteresis must satisfy `0 <= hysteresis < sensitivity`.
    Hysteresis { hysteresis: f32, sensitivity: f32 },
}

impl std::fmt::Display for TiltConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sensitivity(s) => write!(f, "tilt sensitivity must be positive, got {s}"),
            Self::Hysteresis {
                hysteresis,
                sensitivity,
            } => write!(
                f,
                "tilt hysteresis must be in [0, {sensitivity}), got {hysteresis}"
            ),
        }
    }
}

impl std::error::Error for TiltConfigError {}

/// Tilt joystick tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    /// Tilt (g) needed to trigger a press; lower means less tilt.
    pub sensitivity: f32,
    /// Tilt back toward level (g) from the press point needed to release.
    pub hysteresis: f32,
    /// Consecutive stable samples before a change is accepted.
    pub delay: u32,
    /// Sampling cadence of the worker thread.
    pub poll_interval: Duration,
}

impl TiltConfig {
    pub fn new(sensitivity: f32, hysteresis: f32, delay: u32) -> Result<Self, TiltConfigError> {
        if !sensitivity.is_finite() || sensitivity <= 0.0 {
            return Err(TiltConfigError::Sensitivity(sensitivity));
        }
        if !hysteresis.is_finite() || hysteresis < 0.0 || hysteresis >= sensitivity {
            return Err(TiltConfigError::Hysteresis {
                hysteresis,
                sensitivity,
            });
        }
        Ok(Self {
            sensitivity,
            hysteresis,
            delay,
            poll_interval: Duration::from_millis(TILT_POLL_MS as u64),
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Create from environment variables, falling back to defaults.
    ///
    /// An invalid sensitivity/hysteresis pair falls back to the defaults as a whole.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parse<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
            value.and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        let sensitivity = parse(lookup("TILT2048_SENSITIVITY")).unwrap_or(defaults.sensitivity);
        let hysteresis = parse(lookup("TILT2048_HYSTERESIS")).unwrap_or(defaults.hysteresis);
        let delay = parse(lookup("TILT2048_DELAY")).unwrap_or(defaults.delay);
        let poll_interval = parse::<u64>(lookup("TILT2048_POLL_MS"))
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        Self::new(sensitivity, hysteresis, delay)
            .unwrap_or(defaults)
            .with_poll_interval(poll_interval)
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            sensitivity: TILT_SENSITIVITY,
            hysteresis: TILT_HYSTERESIS,
            delay: TILT_DELAY_SAMPLES,
            poll_interval: Duration::from_millis(TILT_POLL_MS as u64),
        }
    }
}

/// Classification of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tilt {
    Negative,
    #[default]
    Neutral,
    Positive,
}

/// Debounce state of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltAxisState {
    negative: Direction,
    positive: Direction,
    current: Tilt,
    last_seen: Tilt,
    stable: Tilt,
    stable_count: u32,
}

impl TiltAxisState {
    pub fn new(negative: Direction, positive: Direction) -> Self {
        Self {
            negative,
            positive,
            current: Tilt::Neutral,
            last_seen: Tilt::Neutral,
            stable: Tilt::Neutral,
            stable_count: 0,
        }
    }

    /// Last classification that survived the debounce.
    pub fn stable(&self) -> Tilt {
        self.stable
    }

    fn direction(&self, tilt: Tilt) -> Option<Direction> {
        match tilt {
            Tilt::Negative => Some(self.negative),
            Tilt::Positive => Some(self.positive),
            Tilt::Neutral => None,
        }
    }

    /// Feed one raw sample; returns `(action, direction)` pairs in emission order.
    pub fn update(&mut self, raw: f32, config: &TiltConfig) -> ArrayVec<(StickAction, Direction), 2> {
        let mut out = ArrayVec::new();

        if raw > config.sensitivity {
            self.current = Tilt::Positive;
        } else if raw < -config.sensitivity {
            self.current = Tilt::Negative;
        } else if raw.abs() < config.sensitivity - config.hysteresis {
            self.current = Tilt::Neutral;
        }

        if self.current == self.last_seen {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.stable_count = 0;
            self.last_seen = self.current;
        }

        if self.stable_count == config.delay {
            if let Some(previous) = self.direction(self.stable) {
                out.push((StickAction::Released, previous));
            }
            if let Some(next) = self.direction(self.current) {
                out.push((StickAction::Pressed, next));
            }
            self.stable = self.current;
        }

        out
    }
}

/// Both axes of the tilt joystick.
///
/// x: negative = left, positive = right. y: negative = up, positive = down.
#[derive(Debug, Clone)]
pub struct TiltProcessor {
    config: TiltConfig,
    x: TiltAxisState,
    y: TiltAxisState,
}

impl TiltProcessor {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            x: TiltAxisState::new(Direction::Left, Direction::Right),
            y: TiltAxisState::new(Direction::Up, Direction::Down),
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn x(&self) -> &TiltAxisState {
        &self.x
    }

    pub fn y(&self) -> &TiltAxisState {
        &self.y
    }

    /// Process one sample taken at `now`. X-axis events come first.
    pub fn sample(&mut self, accel: Acceleration, now: Instant) -> ArrayVec<InputEvent, 4> {
        let mut events = ArrayVec::new();
        for (action, direction) in self
            .x
            .update(accel.x, &self.config)
            .into_iter()
            .chain(self.y.update(accel.y, &self.config))
        {
            events.push(InputEvent::at(now, direction.into(), action));
        }
        events
    }

    /// Forget all axis state.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}
