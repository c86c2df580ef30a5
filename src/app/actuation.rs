//! Actuation drivers — realize the published spec as output state.
//!
//! Two interchangeable strategies behind the same [`IndicatorPort`],
//! selected at startup via [`ActuationMode`](crate::config::ActuationMode):
//!
//! - [`PeriodicTickActuator`] is driven externally (hardware timer on the
//!   board, a tick thread in simulation) at a fixed short base period.
//! - [`DelayLoopActuator`] owns its own task body and sleeps the pattern's
//!   half-period between steps.
//!
//! Both re-read the spec cell on every step, so a band change published by
//! the sampling task takes effect on the next tick/iteration without any
//! coordination beyond the cell's atomic load.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::info;

use crate::classify::Pattern;
use crate::sync::SpecCell;

use super::blink::BlinkStepper;
use super::ports::IndicatorPort;

// ───────────────────────────────────────────────────────────────
// Periodic-tick mode
// ───────────────────────────────────────────────────────────────

/// One blink step per external tick.
pub struct PeriodicTickActuator<P: IndicatorPort> {
    stepper: BlinkStepper,
    spec: Arc<SpecCell>,
    port: P,
    base_tick_ms: u32,
}

impl<P: IndicatorPort> PeriodicTickActuator<P> {
    pub fn new(spec: Arc<SpecCell>, port: P, base_tick_ms: u32) -> Self {
        Self {
            stepper: BlinkStepper::new(),
            spec,
            port,
            base_tick_ms,
        }
    }

    pub fn base_tick_ms(&self) -> u32 {
        self.base_tick_ms
    }

    /// Called from the periodic timer context once per base period.
    pub fn on_tick(&mut self) {
        let spec = self.spec.load();
        let drive = self.stepper.tick(spec, self.base_tick_ms);
        self.port.drive(drive.indicator, drive.on);
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}

// ───────────────────────────────────────────────────────────────
// Task-delay mode
// ───────────────────────────────────────────────────────────────

/// Dedicated-task strategy: one step, then sleep.
pub struct DelayLoopActuator<P: IndicatorPort> {
    stepper: BlinkStepper,
    spec: Arc<SpecCell>,
    port: P,
    idle_poll: Duration,
}

impl<P: IndicatorPort> DelayLoopActuator<P> {
    pub fn new(spec: Arc<SpecCell>, port: P, idle_poll_ms: u32) -> Self {
        Self {
            stepper: BlinkStepper::new(),
            spec,
            port,
            idle_poll: Duration::from_millis(u64::from(idle_poll_ms)),
        }
    }

    /// Apply one step and return how long the task should sleep before the
    /// next one: the half-period while toggling, a short idle poll
    /// otherwise (so spec changes are picked up promptly).
    pub fn iterate(&mut self) -> Duration {
        let spec = self.spec.load();
        let drive = self.stepper.step_once(spec);
        self.port.drive(drive.indicator, drive.on);

        match spec.pattern {
            Pattern::Toggle { half_period_ms } => {
                Duration::from_millis(u64::from(half_period_ms))
            }
            Pattern::Off | Pattern::FixedOn => self.idle_poll,
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Task body — runs forever.
    pub fn run(mut self) -> ! {
        info!("actuation: delay-loop started");
        loop {
            let pause = self.iterate();
            thread::sleep(pause);
        }
    }
}
