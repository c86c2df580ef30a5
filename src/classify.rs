//! Band classification — pure mapping from a raw sample to a blink spec.
//!
//! The monitored 0–3.3 V span maps onto the full 16-bit sample range; each
//! 0.5 V band gets its own indicator color and blink rate.  Classification
//! is table-driven: ranges are evaluated in order and the first match wins,
//! with everything at or above the last bound falling through to fixed-on
//! red.  Keeping the table as data makes every boundary value trivially
//! unit-testable.
//!
//! This module has no hardware dependencies and no side effects.

/// One completed analog conversion, full 16-bit scale.
pub type Sample = u16;

/// Which single output is active; all others are forced inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    None,
    Red,
    Green,
    Blue,
}

/// Activation pattern for the active indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Off,
    FixedOn,
    /// Flip the output every `half_period_ms`; the visible blink frequency
    /// is 1 / (2 × half-period).
    Toggle { half_period_ms: u32 },
}

/// The pair of (active indicator, activation pattern) describing desired
/// visual output.  Published whole — see [`crate::sync::SpecCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkSpec {
    pub indicator: Indicator,
    pub pattern: Pattern,
}

impl BlinkSpec {
    /// Everything dark.
    pub const OFF: Self = Self {
        indicator: Indicator::None,
        pattern: Pattern::Off,
    };
}

/// Toggle half-period for a 10 Hz visible blink.
pub const HALF_PERIOD_10HZ_MS: u32 = 50;
/// Toggle half-period for a 20 Hz visible blink.
pub const HALF_PERIOD_20HZ_MS: u32 = 25;

/// One classification band: `[lower, upper)` in raw sample units.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub lower: Sample,
    pub upper: Sample,
    pub spec: BlinkSpec,
}

const fn band(lower: Sample, upper: Sample, indicator: Indicator, pattern: Pattern) -> Band {
    Band {
        lower,
        upper,
        spec: BlinkSpec { indicator, pattern },
    }
}

const TOGGLE_10HZ: Pattern = Pattern::Toggle {
    half_period_ms: HALF_PERIOD_10HZ_MS,
};
const TOGGLE_20HZ: Pattern = Pattern::Toggle {
    half_period_ms: HALF_PERIOD_20HZ_MS,
};

/// The compiled-in threshold table, in evaluation order.
///
/// Bounds are the 16-bit sample values of 0.5 V steps:
///
/// ```text
/// 0.5 V →  9929      2.0 V → 39718
/// 1.0 V → 19859      2.5 V → 49648
/// 1.5 V → 29789      3.0 V → 59578
/// ```
pub static BANDS: [Band; 6] = [
    band(0, 9929, Indicator::Green, TOGGLE_10HZ),
    band(9929, 19859, Indicator::Green, TOGGLE_20HZ),
    band(19859, 29789, Indicator::Blue, TOGGLE_10HZ),
    band(29789, 39718, Indicator::Blue, TOGGLE_20HZ),
    band(39718, 49648, Indicator::Red, TOGGLE_10HZ),
    band(49648, 59578, Indicator::Red, TOGGLE_20HZ),
];

/// Catch-all for samples at or above the last explicit bound (≥ 3.0 V).
pub const FALLBACK: BlinkSpec = BlinkSpec {
    indicator: Indicator::Red,
    pattern: Pattern::FixedOn,
};

/// Map a raw sample to its blink spec.  Total over the `u16` domain:
/// first matching band wins, anything past the table is [`FALLBACK`].
pub fn classify(sample: Sample) -> BlinkSpec {
    for b in &BANDS {
        if sample >= b.lower && sample < b.upper {
            return b.spec;
        }
    }
    FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_table_is_contiguous_and_ordered() {
        let mut expected_lower = 0;
        for b in &BANDS {
            assert_eq!(b.lower, expected_lower, "gap or overlap at {}", b.lower);
            assert!(b.lower < b.upper);
            expected_lower = b.upper;
        }
    }

    #[test]
    fn lowest_band_is_green_10hz() {
        let spec = classify(0);
        assert_eq!(spec.indicator, Indicator::Green);
        assert_eq!(
            spec.pattern,
            Pattern::Toggle {
                half_period_ms: HALF_PERIOD_10HZ_MS
            }
        );
    }

    #[test]
    fn boundary_values_fall_on_the_documented_side() {
        // Lower bounds are inclusive, upper bounds exclusive.
        let cases: [(Sample, Indicator, Pattern); 8] = [
            (9928, Indicator::Green, TOGGLE_10HZ),
            (9929, Indicator::Green, TOGGLE_20HZ),
            (19858, Indicator::Green, TOGGLE_20HZ),
            (19859, Indicator::Blue, TOGGLE_10HZ),
            (29789, Indicator::Blue, TOGGLE_20HZ),
            (39718, Indicator::Red, TOGGLE_10HZ),
            (59577, Indicator::Red, TOGGLE_20HZ),
            (59578, Indicator::Red, Pattern::FixedOn),
        ];
        for (sample, indicator, pattern) in cases {
            let spec = classify(sample);
            assert_eq!(spec.indicator, indicator, "sample {sample}");
            assert_eq!(spec.pattern, pattern, "sample {sample}");
        }
    }

    #[test]
    fn saturated_input_holds_red() {
        assert_eq!(classify(u16::MAX), FALLBACK);
        assert_eq!(classify(60000), FALLBACK);
    }

    #[test]
    fn classifier_never_emits_indicator_none() {
        // `None` exists for the startup state of the actuation side; no
        // band maps to it.
        for b in &BANDS {
            assert_ne!(b.spec.indicator, Indicator::None);
        }
        assert_ne!(FALLBACK.indicator, Indicator::None);
    }
}
