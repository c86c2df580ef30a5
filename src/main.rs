//! Voltband Firmware — Main Entry Point
//!
//! Fixed entry sequence: bring up peripherals, build the shared pipeline
//! state, route the conversion completion, start the tasks, run forever.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ConversionUnit ──▶ CompletionGate ──▶ SamplingLoop (task)     │
//! │       ▲                                     │ classify          │
//! │       └── start_conversion ◀────────────────┤                   │
//! │                                             ▼                   │
//! │                                         SpecCell                │
//! │                                             │                   │
//! │              PeriodicTickActuator (timer)  OR                   │
//! │              DelayLoopActuator (task) ──▶ IndicatorPins         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;

use voltband::app::actuation::{DelayLoopActuator, PeriodicTickActuator};
use voltband::app::sampling::SamplingLoop;
use voltband::config::{ActuationMode, SystemConfig};
use voltband::drivers::adc::ConversionUnit;
use voltband::drivers::indicator;
use voltband::drivers::task_pin::{self, Core};
use voltband::drivers::{hw_init, hw_timer};
use voltband::sync::{CompletionGate, SampleCell, SpecCell};

/// Unrecoverable bring-up failure: log and park.  There is no shutdown
/// path; in production the watchdog reset takes it from here.
fn halt(what: &str, e: impl std::fmt::Display) -> ! {
    log::error!("{what}: {e} — halting");
    #[allow(clippy::empty_loop)]
    loop {}
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  Voltband v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripheral bring-up ────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        halt("HAL init failed", e);
    }

    // ── 3. Configuration (compiled-in; there is no config surface) ─
    let config = SystemConfig::default();
    info!(
        "Config: mode={:?} tick={}ms idle-poll={}ms conv-timeout={}ms",
        config.actuation_mode,
        config.actuation_tick_ms,
        config.idle_poll_ms,
        config.conversion_timeout_ms
    );

    // ── 4. Shared pipeline state ──────────────────────────────
    let gate = Arc::new(CompletionGate::new());
    let sample = Arc::new(SampleCell::new());
    let spec = Arc::new(SpecCell::new());

    // ── 5. Conversion unit + completion routing ───────────────
    // Routed before any task starts: completions must have somewhere to
    // land from the very first request.
    let conv = ConversionUnit::new(Arc::clone(&gate), Arc::clone(&sample));
    if let Err(e) = conv.install() {
        halt("conversion completion routing failed", e);
    }

    // ── 6. Sampling task ──────────────────────────────────────
    let sampling = SamplingLoop::new(
        conv,
        Arc::clone(&gate),
        Arc::clone(&sample),
        Arc::clone(&spec),
        &config,
    );
    let _sampling_task = task_pin::spawn_on_core(
        Core::App,
        config.sampling_task_priority,
        config.sampling_task_stack_kb,
        "sampling\0",
        move || sampling.run(),
    );

    // ── 7. Actuation (strategy chosen at startup) ─────────────
    let indicator = indicator::board_indicator();
    match config.actuation_mode {
        ActuationMode::PeriodicTick => {
            let actuator = PeriodicTickActuator::new(
                Arc::clone(&spec),
                indicator,
                config.actuation_tick_ms,
            );
            if let Err(e) = hw_timer::start_actuation_timer(actuator) {
                halt("actuation timer start failed", e);
            }
        }
        ActuationMode::DelayLoop => {
            let actuator =
                DelayLoopActuator::new(Arc::clone(&spec), indicator, config.idle_poll_ms);
            let _blink_task = task_pin::spawn_on_core(
                Core::App,
                config.actuation_task_priority,
                config.actuation_task_stack_kb,
                "blink\0",
                move || actuator.run(),
            );
        }
    }

    info!("System ready. Sampling → classify → blink.");

    // ── 8. Run forever ────────────────────────────────────────
    // The pipeline tasks own all the work; nothing to do here.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
