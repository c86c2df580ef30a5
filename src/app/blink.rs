//! Blink stepping engine — turns the published spec into pin-level drives.
//!
//! Pure logic: the stepper holds the elapsed-time counter and current
//! level, and each step returns the [`Drive`] to hand to an
//! [`IndicatorPort`](super::ports::IndicatorPort).  The counter and level
//! reset whenever the spec changes (new indicator *or* new pattern), so a
//! band change shows its new color immediately instead of inheriting the
//! phase of the old one.
//!
//! Two stepping disciplines, one per actuation mode:
//!
//! | method        | used by       | toggle pacing                       |
//! |---------------|---------------|-------------------------------------|
//! | `tick`        | periodic mode | elapsed counter vs. half-period     |
//! | `step_once`   | delay mode    | unconditional flip per call         |

use crate::classify::{BlinkSpec, Indicator, Pattern};

/// One pin-level command: light `indicator` (everything else dark) iff `on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drive {
    pub indicator: Indicator,
    pub on: bool,
}

impl Drive {
    pub const DARK: Self = Self {
        indicator: Indicator::None,
        on: false,
    };
}

/// Stack-allocated blink state.  No heap, no hardware.
pub struct BlinkStepper {
    current: BlinkSpec,
    elapsed_ms: u32,
    level_on: bool,
}

impl BlinkStepper {
    pub fn new() -> Self {
        Self {
            current: BlinkSpec::OFF,
            elapsed_ms: 0,
            level_on: false,
        }
    }

    /// Advance by one base tick of `delta_ms` (periodic-tick mode).
    ///
    /// `Off`/`FixedOn` are idempotent; `Toggle` flips the level each time
    /// the elapsed counter reaches the half-period.
    pub fn tick(&mut self, spec: BlinkSpec, delta_ms: u32) -> Drive {
        // A fresh toggle phase starts lit: the new color is visible for a
        // full half-period before the first flip.
        self.resync(spec, true);

        match spec.pattern {
            Pattern::Off => Drive::DARK,
            Pattern::FixedOn => Drive {
                indicator: spec.indicator,
                on: true,
            },
            Pattern::Toggle { half_period_ms } => {
                self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
                if self.elapsed_ms >= half_period_ms {
                    self.elapsed_ms -= half_period_ms;
                    self.level_on = !self.level_on;
                }
                Drive {
                    indicator: spec.indicator,
                    on: self.level_on,
                }
            }
        }
    }

    /// Apply one step with unconditional toggling (task-delay mode, where
    /// the caller sleeps the half-period between steps).
    pub fn step_once(&mut self, spec: BlinkSpec) -> Drive {
        // The unconditional flip below turns a reset level into "lit", so
        // a fresh spec is visible from its first step here too.
        self.resync(spec, false);

        match spec.pattern {
            Pattern::Off => Drive::DARK,
            Pattern::FixedOn => Drive {
                indicator: spec.indicator,
                on: true,
            },
            Pattern::Toggle { .. } => {
                self.level_on = !self.level_on;
                Drive {
                    indicator: spec.indicator,
                    on: self.level_on,
                }
            }
        }
    }

    fn resync(&mut self, spec: BlinkSpec, reset_level: bool) {
        if spec != self.current {
            self.current = spec;
            self.elapsed_ms = 0;
            self.level_on = reset_level;
        }
    }
}
