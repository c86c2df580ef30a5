//! The sampling loop — steady-state producer of the published blink spec.
//!
//! A two-state machine with no terminal state:
//!
//! ```text
//!          ┌────────────┐  start_conversion() ok  ┌─────────┐
//!          │ Requesting │────────────────────────▶│ Waiting │
//!          └────────────┘                         └─────────┘
//!                ▲   │ busy: yield, retry              │ gate signalled:
//!                │   └──────────────┐                  │ classify + publish
//!                └──────────────────┴──────────────────┘
//! ```
//!
//! Runs as the body of a dedicated task.  Errors never escape: `Busy` is
//! retried after a yield, a completion timeout is logged and the request
//! reissued, and the previously published spec stays in force meanwhile.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::classify::classify;
use crate::config::SystemConfig;
use crate::diagnostics::{self, SampleHistory};
use crate::error::SamplerError;
use crate::sync::{CompletionGate, SampleCell, SpecCell};

use super::ports::ConversionPort;

/// Where the loop currently is.  Exposed for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Requesting,
    Waiting,
}

pub struct SamplingLoop<C: ConversionPort> {
    conv: C,
    gate: Arc<CompletionGate>,
    sample: Arc<SampleCell>,
    spec: Arc<SpecCell>,
    history: SampleHistory,
    timeout: Duration,
    telemetry_every: u32,
    published: u32,
    state: LoopState,
}

impl<C: ConversionPort> SamplingLoop<C> {
    pub fn new(
        conv: C,
        gate: Arc<CompletionGate>,
        sample: Arc<SampleCell>,
        spec: Arc<SpecCell>,
        config: &SystemConfig,
    ) -> Self {
        Self {
            conv,
            gate,
            sample,
            spec,
            history: SampleHistory::new(),
            timeout: Duration::from_millis(u64::from(config.conversion_timeout_ms)),
            telemetry_every: config.telemetry_every_samples,
            published: 0,
            state: LoopState::Requesting,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Total number of specs published so far.
    pub fn published(&self) -> u32 {
        self.published
    }

    /// Advance the state machine by one transition.
    /// Returns `true` iff a new spec was published.
    pub fn step(&mut self) -> bool {
        match self.state {
            LoopState::Requesting => {
                match self.conv.start_conversion() {
                    Ok(()) => self.state = LoopState::Waiting,
                    Err(SamplerError::PeripheralBusy) => {
                        // Single outstanding request: give the completion
                        // path a chance to run, then retry.
                        thread::yield_now();
                    }
                    Err(e) => {
                        warn!("sampling: start_conversion failed: {e}");
                        thread::yield_now();
                    }
                }
                false
            }
            LoopState::Waiting => {
                if self.gate.wait_timeout(self.timeout) {
                    let raw = self.sample.load();
                    let spec = classify(raw);
                    self.spec.publish(spec);
                    self.history.record(raw);
                    self.published = self.published.wrapping_add(1);
                    if self.telemetry_every != 0 && self.published % self.telemetry_every == 0 {
                        diagnostics::log_telemetry(raw, spec, &self.history);
                    }
                    self.state = LoopState::Requesting;
                    true
                } else {
                    // Detectable but unhandled: reissue the request and
                    // leave the last published spec in force.
                    warn!("sampling: {}", SamplerError::ConversionTimeout);
                    self.state = LoopState::Requesting;
                    false
                }
            }
        }
    }

    /// Task body — runs forever.
    pub fn run(mut self) -> ! {
        info!("sampling: loop started");
        loop {
            self.step();
        }
    }
}
