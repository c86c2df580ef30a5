//! Sample telemetry for the debug console.
//!
//! Keeps a fixed-capacity history of recent raw samples and periodically
//! logs a one-line summary alongside the band the latest sample landed in.
//! Observability only — nothing here feeds back into classification or
//! actuation.

use heapless::HistoryBuffer;
use log::info;

use crate::classify::{BlinkSpec, Indicator, Pattern, Sample};

const HISTORY_CAP: usize = 32;

/// Rolling window of recent raw samples.  Fixed capacity, no heap.
pub struct SampleHistory {
    buf: HistoryBuffer<Sample, HISTORY_CAP>,
}

impl SampleHistory {
    pub fn new() -> Self {
        Self {
            buf: HistoryBuffer::new(),
        }
    }

    pub fn record(&mut self, raw: Sample) {
        self.buf.write(raw);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.len() == 0
    }

    pub fn min(&self) -> Option<Sample> {
        self.buf.oldest_ordered().copied().min()
    }

    pub fn max(&self) -> Option<Sample> {
        self.buf.oldest_ordered().copied().max()
    }

    pub fn mean(&self) -> Option<Sample> {
        if self.buf.len() == 0 {
            return None;
        }
        let sum: u32 = self.buf.oldest_ordered().map(|&s| u32::from(s)).sum();
        Some((sum / self.buf.len() as u32) as Sample)
    }
}

/// Emit the periodic telemetry line for the latest published sample.
pub fn log_telemetry(raw: Sample, spec: BlinkSpec, history: &SampleHistory) {
    let color = match spec.indicator {
        Indicator::None => "none",
        Indicator::Red => "red",
        Indicator::Green => "green",
        Indicator::Blue => "blue",
    };
    match spec.pattern {
        Pattern::Off => log_line(raw, color, "off", history),
        Pattern::FixedOn => log_line(raw, color, "fixed-on", history),
        Pattern::Toggle { half_period_ms } => {
            let mut pattern = heapless::String::<24>::new();
            let _ = core::fmt::Write::write_fmt(
                &mut pattern,
                format_args!("toggle@{half_period_ms}ms"),
            );
            log_line(raw, color, pattern.as_str(), history);
        }
    }
}

fn log_line(raw: Sample, color: &str, pattern: &str, history: &SampleHistory) {
    info!(
        "telemetry: raw={} band={}/{} window(min={} max={} mean={})",
        raw,
        color,
        pattern,
        history.min().unwrap_or(0),
        history.max().unwrap_or(0),
        history.mean().unwrap_or(0),
    );
}
