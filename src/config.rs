//! System configuration parameters
//!
//! Timing and scheduling knobs for the sampling/actuation pipeline.  The
//! band thresholds themselves are compiled-in (see `classify`); this module
//! only configures *when* things run, not *what* the bands mean.

use serde::{Deserialize, Serialize};

/// How the actuation side realises the published blink spec.
///
/// Both strategies are functionally equivalent; the choice is made once at
/// startup, not at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuationMode {
    /// A periodic timer at `actuation_tick_ms` drives one blink step per
    /// firing; toggling is paced by an elapsed-time counter.
    PeriodicTick,
    /// A dedicated task applies one step per iteration and sleeps for the
    /// pattern's half-period between steps.
    DelayLoop,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Actuation ---
    /// Scheduling strategy for the indicator driver.
    pub actuation_mode: ActuationMode,
    /// Base tick period for [`ActuationMode::PeriodicTick`] (milliseconds).
    /// Must not exceed the shortest toggle half-period in the band table.
    pub actuation_tick_ms: u32,
    /// Sleep between delay-loop iterations while the pattern is `Off` or
    /// `FixedOn` — keeps the task responsive to spec changes (milliseconds).
    pub idle_poll_ms: u32,

    // --- Sampling ---
    /// Upper bound on the wait for a conversion-complete signal
    /// (milliseconds).  Expiry is logged, never fatal.
    pub conversion_timeout_ms: u32,

    // --- Telemetry ---
    /// Emit one telemetry log line every N published samples.
    pub telemetry_every_samples: u32,

    // --- Task sizing ---
    /// Sampling task stack (KiB) and FreeRTOS priority.
    pub sampling_task_stack_kb: usize,
    pub sampling_task_priority: u8,
    /// Delay-loop actuation task stack (KiB) and FreeRTOS priority.
    pub actuation_task_stack_kb: usize,
    pub actuation_task_priority: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Actuation — delay-loop is the shipped default
            actuation_mode: ActuationMode::DelayLoop,
            actuation_tick_ms: 5,
            idle_poll_ms: 10,

            // Sampling
            conversion_timeout_ms: 100,

            // Telemetry
            telemetry_every_samples: 100,

            // Task sizing
            sampling_task_stack_kb: 8,
            sampling_task_priority: 6,
            actuation_task_stack_kb: 8,
            actuation_task_priority: 5,
        }
    }
}
