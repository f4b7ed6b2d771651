//! Tilt joystick: accelerometer sampling on a background thread.
//!
//! [`TiltJoystick::enable`] hands the sensor to a worker thread that samples it
//! every `poll_interval`, runs a fresh [`TiltProcessor`], and pushes the
//! resulting events into the joystick's [`EventQueue`]. [`TiltJoystick::disable`]
//! stops the worker and joins it; the join hands the sensor back so the
//! joystick can be enabled again.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::queue::{EventQueue, EventSource, Polled};
use crate::sensor::Accelerometer;
use crate::tilt::{TiltConfig, TiltProcessor};
use crate::types::InputEvent;

/// Signal for stopping a worker thread.
///
/// The worker sleeps on it between samples, so a stop request interrupts the
/// sleep instead of waiting out the poll interval.
#[derive(Debug, Clone, Default)]
pub(crate) struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub(crate) fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `duration` or until stopped. Returns `true` if stopped.
    pub(crate) fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + duration;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if *stopped {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
        }
    }
}

struct Worker<S> {
    stop: StopSignal,
    handle: JoinHandle<S>,
}

enum SensorSlot<S> {
    Idle(S),
    Running(Worker<S>),
    /// The worker panicked and took the sensor with it.
    Lost,
}

/// Joystick-like directional input from tilting the device.
///
/// Call [`enable`](Self::enable) before waiting for events: a disabled
/// joystick produces nothing, and [`wait_for_event`](Self::wait_for_event)
/// would block forever.
pub struct TiltJoystick<S: Accelerometer> {
    config: TiltConfig,
    queue: EventQueue,
    slot: SensorSlot<S>,
}

impl<S: Accelerometer> TiltJoystick<S> {
    pub fn new(sensor: S, config: TiltConfig) -> Self {
        Self::with_queue(sensor, config, EventQueue::new())
    }

    /// Deliver events into an existing queue shared with other input sources.
    pub fn with_queue(sensor: S, config: TiltConfig, queue: EventQueue) -> Self {
        Self {
            config,
            queue,
            slot: SensorSlot::Idle(sensor),
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    /// Handle to the queue this joystick delivers into.
    pub fn queue(&self) -> EventQueue {
        self.queue.clone()
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.slot, SensorSlot::Running(_))
    }

    /// Start the sampling thread. Does nothing if it is already running.
    pub fn enable(&mut self) {
        let slot = std::mem::replace(&mut self.slot, SensorSlot::Lost);
        self.slot = match slot {
            SensorSlot::Idle(sensor) => {
                let stop = StopSignal::new();
                let handle = spawn_sampler(sensor, self.config, self.queue.clone(), stop.clone());
                tracing::debug!(
                    sensitivity = self.config.sensitivity,
                    hysteresis = self.config.hysteresis,
                    delay = self.config.delay,
                    "tilt sensing enabled"
                );
                SensorSlot::Running(Worker { stop, handle })
            }
            SensorSlot::Lost => {
                tracing::warn!("tilt sensor lost after a worker panic; cannot enable");
                SensorSlot::Lost
            }
            running => running,
        };
    }

    /// Stop the sampling thread and wait for it to exit.
    ///
    /// No event is pushed by this joystick after `disable` returns. Events
    /// queued before that stay in the queue until drained.
    pub fn disable(&mut self) {
        let slot = std::mem::replace(&mut self.slot, SensorSlot::Lost);
        self.slot = match slot {
            SensorSlot::Running(worker) => {
                worker.stop.stop();
                match worker.handle.join() {
                    Ok(sensor) => {
                        tracing::debug!("tilt sensing disabled");
                        SensorSlot::Idle(sensor)
                    }
                    Err(_) => {
                        tracing::error!("tilt sampling thread panicked");
                        SensorSlot::Lost
                    }
                }
            }
            other => other,
        };
    }

    /// Block until a tilt event arrives.
    pub fn wait_for_event(&self) -> Option<InputEvent> {
        self.queue.wait()
    }

    /// All tilt events since the last call, without waiting.
    pub fn get_events(&self) -> Vec<InputEvent> {
        self.queue.drain()
    }
}

impl<S: Accelerometer> EventSource for TiltJoystick<S> {
    fn wait_for_event(&mut self) -> Option<InputEvent> {
        TiltJoystick::wait_for_event(self)
    }

    fn get_events(&mut self) -> Vec<InputEvent> {
        TiltJoystick::get_events(self)
    }

    fn poll_event(&mut self, timeout: Duration) -> Polled {
        self.queue.poll_event(timeout)
    }
}

impl<S: Accelerometer> Drop for TiltJoystick<S> {
    fn drop(&mut self) {
        self.disable();
    }
}

fn spawn_sampler<S: Accelerometer>(
    mut sensor: S,
    config: TiltConfig,
    queue: EventQueue,
    stop: StopSignal,
) -> JoinHandle<S> {
    thread::spawn(move || {
        // Fresh axis state on every start.
        let mut processor = TiltProcessor::new(config);
        while !stop.is_stopped() {
            let accel = sensor.read();
            for event in processor.sample(accel, Instant::now()) {
                tracing::trace!(
                    direction = event.direction.as_str(),
                    action = event.action.as_str(),
                    "tilt event"
                );
                queue.push(event);
            }
            if stop.wait_timeout(config.poll_interval) {
                break;
            }
        }
        sensor
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{Acceleration, ScriptedAccelerometer};
    use crate::types::{StickAction, StickDirection};

    fn fast_config() -> TiltConfig {
        TiltConfig::new(0.4, 0.2, 3)
            .unwrap()
            .with_poll_interval(Duration::from_millis(1))
    }

    #[test]
    fn test_stop_signal_interrupts_wait() {
        let stop = StopSignal::new();
        let waiter = stop.clone();
        let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(10));
        stop.stop();
        assert!(handle.join().unwrap());
        assert!(stop.is_stopped());
    }

    #[test]
    fn test_enable_is_idempotent() {
        let sensor = ScriptedAccelerometer::new(Vec::new());
        let mut joystick = TiltJoystick::new(sensor, fast_config());
        joystick.enable();
        joystick.enable();
        assert!(joystick.is_enabled());
        joystick.disable();
        assert!(!joystick.is_enabled());
        joystick.disable();
    }

    #[test]
    fn test_wait_for_event_receives_press() {
        let sensor = ScriptedAccelerometer::new(Vec::new()).then(Acceleration::tilt(0.0, 0.9), 1);
        let mut joystick = TiltJoystick::new(sensor, fast_config());
        joystick.enable();
        let event = joystick.wait_for_event().unwrap();
        joystick.disable();
        assert_eq!(event.direction, StickDirection::Down);
        assert_eq!(event.action, StickAction::Pressed);
    }
}
