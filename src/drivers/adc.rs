//! Band-input conversion driver.
//!
//! [`ConversionUnit::start_conversion`] commands one conversion; completion
//! arrives asynchronously — the result lands in the pipeline's
//! [`SampleCell`] and the [`CompletionGate`] is posted exactly once per
//! accepted request.  At most one conversion is in flight at a time,
//! tracked by an atomic flag.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the request arms a zero-delay one-shot esp_timer whose
//! callback executes in the esp_timer task context (not a raw ISR, so the
//! gate's condvar post is safe there), reads the converted value, and
//! completes.  On host/test: completion runs synchronously from a static
//! injection atomic (`sim_set_raw_sample`).

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::ports::ConversionPort;
use crate::drivers::hw_init::HwInitError;
use crate::error::SamplerError;
use crate::sync::{CompletionGate, SampleCell};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::AtomicU16;

#[cfg(not(target_os = "espidf"))]
static SIM_RAW: AtomicU16 = AtomicU16::new(0);

/// Inject the value the next simulated conversion will produce.
/// Full 16-bit band scale, unlike the board's 12-bit conversions.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw_sample(raw: u16) {
    SIM_RAW.store(raw, Ordering::Relaxed);
}

// ── Completion routing (ESP-IDF) ──────────────────────────────

#[cfg(target_os = "espidf")]
struct CompletionHook {
    gate: Arc<CompletionGate>,
    sample: Arc<SampleCell>,
    in_flight: Arc<AtomicBool>,
}

// Written once in `install()` before the sampling task starts; afterwards
// the callback is the only reader.
#[cfg(target_os = "espidf")]
static COMPLETION: std::sync::OnceLock<CompletionHook> = std::sync::OnceLock::new();

#[cfg(target_os = "espidf")]
static mut CONV_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn conversion_done_cb(_arg: *mut core::ffi::c_void) {
    let Some(hook) = COMPLETION.get() else {
        return;
    };
    // 12-bit conversion left-aligned onto the 16-bit scale the band table
    // is defined on.
    let raw = crate::drivers::hw_init::adc1_read(crate::pins::BAND_ADC_CH) << 4;
    hook.sample.publish(raw);
    hook.in_flight.store(false, Ordering::Release);
    hook.gate.post();
}

// ── ConversionUnit ────────────────────────────────────────────

/// The single user of the conversion peripheral.
pub struct ConversionUnit {
    gate: Arc<CompletionGate>,
    sample: Arc<SampleCell>,
    in_flight: Arc<AtomicBool>,
}

impl ConversionUnit {
    pub fn new(gate: Arc<CompletionGate>, sample: Arc<SampleCell>) -> Self {
        Self {
            gate,
            sample,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Route the completion callback.  Call once from `main()` before the
    /// sampling task starts.
    #[cfg(target_os = "espidf")]
    pub fn install(&self) -> Result<(), HwInitError> {
        COMPLETION
            .set(CompletionHook {
                gate: Arc::clone(&self.gate),
                sample: Arc::clone(&self.sample),
                in_flight: Arc::clone(&self.in_flight),
            })
            .map_err(|_| HwInitError::TimerInitFailed(0))?;

        let args = esp_timer_create_args_t {
            callback: Some(conversion_done_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"conv\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        // SAFETY: CONV_TIMER is written here once at boot, before any
        // request can arm it.
        let ret = unsafe { esp_timer_create(&args, &raw mut CONV_TIMER) };
        if ret != ESP_OK {
            return Err(HwInitError::TimerInitFailed(ret));
        }

        info!("adc: conversion completion routing installed");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn install(&self) -> Result<(), HwInitError> {
        log::info!("adc(sim): conversions complete synchronously");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn trigger(&mut self) -> Result<(), SamplerError> {
        // SAFETY: CONV_TIMER was created in install() before the sampling
        // task started; by-value read of the handle.
        let ret = unsafe { esp_timer_start_once(CONV_TIMER, 0) };
        if ret != ESP_OK {
            // Transient esp_timer condition; the retry path heals it.
            log::error!("adc: conversion trigger failed (rc={}) — treating as busy", ret);
            self.in_flight.store(false, Ordering::Release);
            return Err(SamplerError::PeripheralBusy);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn trigger(&mut self) -> Result<(), SamplerError> {
        let raw = SIM_RAW.load(Ordering::Relaxed);
        self.sample.publish(raw);
        self.in_flight.store(false, Ordering::Release);
        self.gate.post();
        Ok(())
    }
}

impl ConversionPort for ConversionUnit {
    fn start_conversion(&mut self) -> Result<(), SamplerError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(SamplerError::PeripheralBusy);
        }
        self.trigger()
    }
}
