//! Integration tests: conversion → sampling loop → spec cell → actuation.
//!
//! These run on the host and drive the real pipeline types against the
//! recording mocks, plus the cross-thread publish/consume guarantees of
//! the synchronization layer.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use voltband::app::actuation::{DelayLoopActuator, PeriodicTickActuator};
use voltband::app::sampling::SamplingLoop;
use voltband::classify::{BlinkSpec, Indicator, Pattern, FALLBACK, HALF_PERIOD_10HZ_MS};
use voltband::config::SystemConfig;
use voltband::drivers::adc::{sim_set_raw_sample, ConversionUnit};
use voltband::sync::{CompletionGate, SampleCell, SpecCell};

use crate::mock_hw::{RecordingIndicator, ScriptedConversion};

struct Cells {
    gate: Arc<CompletionGate>,
    sample: Arc<SampleCell>,
    spec: Arc<SpecCell>,
}

fn cells() -> Cells {
    Cells {
        gate: Arc::new(CompletionGate::new()),
        sample: Arc::new(SampleCell::new()),
        spec: Arc::new(SpecCell::new()),
    }
}

fn quick_config() -> SystemConfig {
    SystemConfig {
        conversion_timeout_ms: 20,
        ..SystemConfig::default()
    }
}

// ── End-to-end: low sample → green toggling at ~10 Hz ─────────

#[test]
fn low_sample_blinks_green_slow_and_nothing_else() {
    let c = cells();
    let conv = ScriptedConversion::new(&c.gate, &c.sample, &[0]);
    let mut sampling = SamplingLoop::new(
        conv,
        Arc::clone(&c.gate),
        Arc::clone(&c.sample),
        Arc::clone(&c.spec),
        &quick_config(),
    );

    sampling.step();
    sampling.step();
    assert_eq!(
        c.spec.load(),
        BlinkSpec {
            indicator: Indicator::Green,
            pattern: Pattern::Toggle {
                half_period_ms: HALF_PERIOD_10HZ_MS
            },
        }
    );

    // Drive the periodic actuator for one simulated second.
    let mut act = PeriodicTickActuator::new(Arc::clone(&c.spec), RecordingIndicator::new(), 5);
    for _ in 0..200 {
        act.on_tick();
    }

    let port = act.port();
    // 1000 ms / 50 ms half-period → 20 level changes, ±1 for phase.
    let flips = port.flips_of(Indicator::Green);
    assert!(
        (19..=21).contains(&flips),
        "expected ~20 green flips, got {flips}"
    );
    assert!(!port.ever_lit(Indicator::Red));
    assert!(!port.ever_lit(Indicator::Blue));
    assert!(port.max_simultaneous_lit <= 1);
}

// ── End-to-end: saturated sample → red held continuously ──────

#[test]
fn saturated_sample_holds_red_without_flicker() {
    let c = cells();
    let conv = ScriptedConversion::new(&c.gate, &c.sample, &[60000]);
    let mut sampling = SamplingLoop::new(
        conv,
        Arc::clone(&c.gate),
        Arc::clone(&c.sample),
        Arc::clone(&c.spec),
        &quick_config(),
    );
    sampling.step();
    sampling.step();
    assert_eq!(c.spec.load(), FALLBACK);

    let mut act = PeriodicTickActuator::new(Arc::clone(&c.spec), RecordingIndicator::new(), 5);
    for _ in 0..100 {
        act.on_tick();
    }

    let port = act.port();
    assert!(port.is_lit(Indicator::Red));
    // One off→on transition at the start, then rock steady.
    assert_eq!(port.flips_of(Indicator::Red), 1);
    assert!(!port.ever_lit(Indicator::Green));
    assert!(!port.ever_lit(Indicator::Blue));
}

// ── Band change mid-flight switches color with no overlap ─────

#[test]
fn band_change_switches_color_without_overlap() {
    let c = cells();
    let conv = ScriptedConversion::new(&c.gate, &c.sample, &[0, 25000]);
    let mut sampling = SamplingLoop::new(
        conv,
        Arc::clone(&c.gate),
        Arc::clone(&c.sample),
        Arc::clone(&c.spec),
        &quick_config(),
    );
    let mut act = PeriodicTickActuator::new(Arc::clone(&c.spec), RecordingIndicator::new(), 5);

    sampling.step();
    sampling.step(); // publishes green band
    for _ in 0..20 {
        act.on_tick();
    }
    sampling.step();
    sampling.step(); // publishes blue band
    for _ in 0..20 {
        act.on_tick();
    }

    let port = act.port();
    assert!(port.ever_lit(Indicator::Green));
    assert!(port.ever_lit(Indicator::Blue));
    assert!(port.max_simultaneous_lit <= 1, "colors overlapped");
    assert!(port.is_lit(Indicator::Blue));
}

// ── Delay-loop mode end-to-end ────────────────────────────────

#[test]
fn delay_mode_realises_the_published_spec() {
    let c = cells();
    let conv = ScriptedConversion::new(&c.gate, &c.sample, &[0]);
    let mut sampling = SamplingLoop::new(
        conv,
        Arc::clone(&c.gate),
        Arc::clone(&c.sample),
        Arc::clone(&c.spec),
        &quick_config(),
    );
    sampling.step();
    sampling.step();

    let mut act = DelayLoopActuator::new(Arc::clone(&c.spec), RecordingIndicator::new(), 10);
    let mut pauses = Vec::new();
    for _ in 0..6 {
        pauses.push(act.iterate());
    }

    // Toggling at the 10 Hz band: every pause is the 50 ms half-period and
    // the level alternates on every iteration.
    assert!(pauses
        .iter()
        .all(|p| *p == Duration::from_millis(u64::from(HALF_PERIOD_10HZ_MS))));
    assert_eq!(act.port().flips_of(Indicator::Green), 6);
    assert!(act.port().max_simultaneous_lit <= 1);
}

// ── Real conversion unit (sim completion path) ────────────────

#[test]
fn conversion_unit_feeds_the_loop_end_to_end() {
    let c = cells();
    sim_set_raw_sample(60000);
    let conv = ConversionUnit::new(Arc::clone(&c.gate), Arc::clone(&c.sample));
    conv.install().unwrap();

    let mut sampling = SamplingLoop::new(
        conv,
        Arc::clone(&c.gate),
        Arc::clone(&c.sample),
        Arc::clone(&c.spec),
        &quick_config(),
    );
    sampling.step();
    sampling.step();

    assert_eq!(c.spec.load(), FALLBACK);
    assert_eq!(sampling.published(), 1);
}

// ── Concurrency: completion bursts never lose a signal ────────

#[test]
fn completion_burst_is_fully_consumed() {
    const BURST: u32 = 1000;
    let gate = Arc::new(CompletionGate::new());

    let poster = Arc::clone(&gate);
    let producer = thread::spawn(move || {
        for _ in 0..BURST {
            poster.post();
        }
    });

    let mut consumed = 0;
    while consumed < BURST {
        assert!(
            gate.wait_timeout(Duration::from_secs(2)),
            "lost a completion after {consumed}"
        );
        consumed += 1;
    }
    producer.join().unwrap();
    assert_eq!(gate.pending(), 0);
}

// ── Concurrency: spec reads are never torn ────────────────────

#[test]
fn spec_cell_reads_are_never_torn() {
    let spec = Arc::new(SpecCell::new());
    let a = BlinkSpec {
        indicator: Indicator::Green,
        pattern: Pattern::Toggle {
            half_period_ms: HALF_PERIOD_10HZ_MS,
        },
    };
    let b = FALLBACK;
    spec.publish(a);

    let writer_spec = Arc::clone(&spec);
    let writer = thread::spawn(move || {
        for i in 0..50_000u32 {
            writer_spec.publish(if i % 2 == 0 { a } else { b });
        }
    });

    // Every observed value must be exactly one of the two published specs
    // — any interleaving of their encodings would betray a torn read.
    for _ in 0..50_000u32 {
        let s = spec.load();
        assert!(s == a || s == b, "torn spec read: {s:?}");
    }
    writer.join().unwrap();
}

// ── Sampling loop never reads a stale sample after its signal ─

#[test]
fn published_spec_always_matches_the_latest_sample() {
    let c = cells();
    // Rapid alternation between the extreme bands.
    let script: Vec<u16> = (0..40).map(|i| if i % 2 == 0 { 0 } else { 60000 }).collect();
    let conv = ScriptedConversion::new(&c.gate, &c.sample, &script);
    let mut sampling = SamplingLoop::new(
        conv,
        Arc::clone(&c.gate),
        Arc::clone(&c.sample),
        Arc::clone(&c.spec),
        &quick_config(),
    );

    for i in 0..40 {
        sampling.step();
        sampling.step();
        let expected = if i % 2 == 0 {
            Indicator::Green
        } else {
            Indicator::Red
        };
        assert_eq!(c.spec.load().indicator, expected, "iteration {i}");
    }
    assert_eq!(sampling.published(), 40);
}
