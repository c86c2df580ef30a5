//! Mock hardware for integration tests.
//!
//! Records every indicator drive and models the three output pins, so
//! tests can assert on the full command history and on the pin-level
//! mutual-exclusion invariant without touching real GPIO.

use std::collections::VecDeque;
use std::sync::Arc;

use voltband::app::ports::{ConversionPort, IndicatorPort};
use voltband::classify::Indicator;
use voltband::error::SamplerError;
use voltband::sync::{CompletionGate, SampleCell};

// ── Indicator call record ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCall {
    Drive { indicator: Indicator, on: bool },
    AllOff,
}

// ── RecordingIndicator ────────────────────────────────────────

/// Indicator port that mirrors pin state and remembers the worst case
/// number of simultaneously lit outputs ever observed.
pub struct RecordingIndicator {
    pub calls: Vec<IndicatorCall>,
    lit: [bool; 3], // red, green, blue
    pub max_simultaneous_lit: usize,
}

#[allow(dead_code)]
impl RecordingIndicator {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            lit: [false; 3],
            max_simultaneous_lit: 0,
        }
    }

    fn slot(indicator: Indicator) -> Option<usize> {
        match indicator {
            Indicator::Red => Some(0),
            Indicator::Green => Some(1),
            Indicator::Blue => Some(2),
            Indicator::None => None,
        }
    }

    pub fn is_lit(&self, indicator: Indicator) -> bool {
        Self::slot(indicator).map(|i| self.lit[i]).unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|&&l| l).count()
    }

    /// Number of level changes observed on one indicator across the call
    /// history.
    pub fn flips_of(&self, indicator: Indicator) -> usize {
        let mut level = false;
        let mut flips = 0;
        for call in &self.calls {
            let now = match *call {
                IndicatorCall::Drive { indicator: i, on } => i == indicator && on,
                IndicatorCall::AllOff => false,
            };
            if now != level {
                flips += 1;
            }
            level = now;
        }
        flips
    }

    /// True if `indicator` was ever lit across the whole history.
    pub fn ever_lit(&self, indicator: Indicator) -> bool {
        self.calls.iter().any(|c| {
            matches!(*c, IndicatorCall::Drive { indicator: i, on } if i == indicator && on)
        })
    }
}

impl Default for RecordingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for RecordingIndicator {
    fn drive(&mut self, indicator: Indicator, on: bool) {
        self.calls.push(IndicatorCall::Drive { indicator, on });
        self.lit = [false; 3];
        if let Some(i) = Self::slot(indicator) {
            self.lit[i] = on;
        }
        self.update_max_lit();
    }

    fn all_off(&mut self) {
        self.calls.push(IndicatorCall::AllOff);
        self.lit = [false; 3];
    }
}

impl RecordingIndicator {
    fn update_max_lit(&mut self) {
        let count = self.lit_count();
        if count > self.max_simultaneous_lit {
            self.max_simultaneous_lit = count;
        }
    }
}

// ── ScriptedConversion ────────────────────────────────────────

/// Conversion peripheral whose completion side runs synchronously and
/// produces a scripted sequence of raw samples.  An optional busy prefix
/// rejects the first N requests with `PeripheralBusy`.
pub struct ScriptedConversion {
    gate: Arc<CompletionGate>,
    sample: Arc<SampleCell>,
    pub results: VecDeque<u16>,
    pub busy_for: u32,
    pub starts: u32,
}

#[allow(dead_code)]
impl ScriptedConversion {
    pub fn new(gate: &Arc<CompletionGate>, sample: &Arc<SampleCell>, results: &[u16]) -> Self {
        Self {
            gate: Arc::clone(gate),
            sample: Arc::clone(sample),
            results: results.iter().copied().collect(),
            busy_for: 0,
            starts: 0,
        }
    }
}

impl ConversionPort for ScriptedConversion {
    fn start_conversion(&mut self) -> Result<(), SamplerError> {
        self.starts += 1;
        if self.busy_for > 0 {
            self.busy_for -= 1;
            return Err(SamplerError::PeripheralBusy);
        }
        if let Some(raw) = self.results.pop_front() {
            self.sample.publish(raw);
            self.gate.post();
        }
        Ok(())
    }
}
