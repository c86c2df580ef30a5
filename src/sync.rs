//! Cross-context synchronization primitives for the sampling pipeline.
//!
//! Three small pieces, each with exactly one writer:
//!
//! ```text
//! completion callback ──▶ SampleCell (AtomicU16) ──▶ sampling task
//! completion callback ──▶ CompletionGate (post)  ──▶ sampling task (wait)
//! sampling task       ──▶ SpecCell (AtomicU32)   ──▶ actuation (any tick)
//! ```
//!
//! The gate is a counting signal: every accepted conversion request is
//! answered by exactly one `post`, so a burst of completions can never be
//! lost between a post and the consumer's next wait.  On ESP-IDF the post
//! side runs in the esp_timer task context (not a raw ISR), which makes the
//! condvar-based wake safe; see `drivers::adc`.
//!
//! Both cells are single words, so publish is one atomic store and readers
//! can never observe a half-written value.

use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::classify::{BlinkSpec, Indicator, Pattern, Sample};

// ---------------------------------------------------------------------------
// CompletionGate
// ---------------------------------------------------------------------------

/// Counting completion signal between the conversion-done context and the
/// sampling task.  Single producer, single consumer.
pub struct CompletionGate {
    pending: Mutex<u32>,
    cv: Condvar,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(0),
            cv: Condvar::new(),
        }
    }

    /// Signal one completed conversion.  Callable from the completion
    /// callback context; never blocks beyond the internal lock.
    pub fn post(&self) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *pending = pending.saturating_add(1);
        self.cv.notify_one();
    }

    /// Block until a completion is pending, then consume it.
    pub fn wait(&self) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *pending == 0 {
            pending = self
                .cv
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *pending -= 1;
    }

    /// Like [`wait`](Self::wait) but bounded.  Returns `true` if a
    /// completion was consumed, `false` on timeout (nothing consumed).
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (mut pending, result) = self
            .cv
            .wait_timeout_while(pending, timeout, |p| *p == 0)
            .unwrap_or_else(PoisonError::into_inner);
        if result.timed_out() && *pending == 0 {
            return false;
        }
        *pending -= 1;
        true
    }

    /// Number of unconsumed completions (diagnostics only).
    pub fn pending(&self) -> u32 {
        *self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// SampleCell
// ---------------------------------------------------------------------------

/// Latest raw conversion result.  Written only by the completion path,
/// read only by the sampling task.  Last-write-wins, no history.
pub struct SampleCell(AtomicU16);

impl SampleCell {
    pub fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    pub fn publish(&self, raw: Sample) {
        self.0.store(raw, Ordering::Release);
    }

    pub fn load(&self) -> Sample {
        self.0.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// SpecCell
// ---------------------------------------------------------------------------

// Packed word layout:  [31:28] indicator  [27:24] pattern  [23:0] half-period
const INDICATOR_SHIFT: u32 = 28;
const PATTERN_SHIFT: u32 = 24;
const PERIOD_MASK: u32 = 0x00FF_FFFF;

const PAT_OFF: u32 = 0;
const PAT_FIXED_ON: u32 = 1;
const PAT_TOGGLE: u32 = 2;

fn encode(spec: BlinkSpec) -> u32 {
    let ind = match spec.indicator {
        Indicator::None => 0,
        Indicator::Red => 1,
        Indicator::Green => 2,
        Indicator::Blue => 3,
    };
    let (pat, period) = match spec.pattern {
        Pattern::Off => (PAT_OFF, 0),
        Pattern::FixedOn => (PAT_FIXED_ON, 0),
        Pattern::Toggle { half_period_ms } => (PAT_TOGGLE, half_period_ms & PERIOD_MASK),
    };
    (ind << INDICATOR_SHIFT) | (pat << PATTERN_SHIFT) | period
}

fn decode(word: u32) -> BlinkSpec {
    let indicator = match word >> INDICATOR_SHIFT {
        1 => Indicator::Red,
        2 => Indicator::Green,
        3 => Indicator::Blue,
        _ => Indicator::None,
    };
    let pattern = match (word >> PATTERN_SHIFT) & 0xF {
        PAT_FIXED_ON => Pattern::FixedOn,
        PAT_TOGGLE => Pattern::Toggle {
            half_period_ms: word & PERIOD_MASK,
        },
        _ => Pattern::Off,
    };
    BlinkSpec { indicator, pattern }
}

/// The published blink spec — the only channel between sampling and
/// actuation.  One writer (the sampling task), any number of readers.
///
/// The spec is packed into a single `u32` so publishing is one atomic
/// store; a reader observes either the previous or the new spec in full,
/// never a mix of the two.
pub struct SpecCell(AtomicU32);

impl SpecCell {
    /// Starts as [`BlinkSpec::OFF`] — nothing lit until the first sample.
    pub fn new() -> Self {
        Self(AtomicU32::new(encode(BlinkSpec::OFF)))
    }

    pub fn publish(&self, spec: BlinkSpec) {
        self.0.store(encode(spec), Ordering::Release);
    }

    pub fn load(&self) -> BlinkSpec {
        decode(self.0.load(Ordering::Acquire))
    }
}
