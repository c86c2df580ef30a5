//! Periodic actuation timer.
//!
//! In periodic-tick mode the indicator is stepped from a fixed-rate timer
//! rather than a task.  On ESP-IDF this is a periodic esp_timer; its
//! callbacks execute in the esp_timer task context (not an ISR), so they
//! can safely take the short actuator lock.  On host/sim targets a plain
//! sleeping thread provides the same cadence.

use crate::app::actuation::PeriodicTickActuator;
use crate::drivers::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use crate::drivers::indicator::{GpioOut, IndicatorPins};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use std::sync::Mutex;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut ACT_TIMER: esp_timer_handle_t = core::ptr::null_mut();

// The actuator lives in a static so the C callback can reach it.  Locked
// only by the callback after `start_actuation_timer` has stored it; the
// critical section is one blink step, O(1).
#[cfg(target_os = "espidf")]
static ACTUATOR: Mutex<Option<PeriodicTickActuator<IndicatorPins<GpioOut>>>> = Mutex::new(None);

#[cfg(target_os = "espidf")]
unsafe extern "C" fn actuation_tick_cb(_arg: *mut core::ffi::c_void) {
    if let Ok(mut guard) = ACTUATOR.lock() {
        if let Some(actuator) = guard.as_mut() {
            actuator.on_tick();
        }
    }
}

/// Start stepping `actuator` once per its base tick period.
#[cfg(target_os = "espidf")]
pub fn start_actuation_timer(
    actuator: PeriodicTickActuator<IndicatorPins<GpioOut>>,
) -> Result<(), HwInitError> {
    let period_us = u64::from(actuator.base_tick_ms()) * 1_000;
    let base_tick_ms = actuator.base_tick_ms();

    // Store before arming: the first callback must find the actuator.
    if let Ok(mut guard) = ACTUATOR.lock() {
        *guard = Some(actuator);
    }

    // SAFETY: ACT_TIMER is written here once at boot from the single
    // main-task context before the timer is started.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(actuation_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"act-tick\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut ACT_TIMER);
        if ret != ESP_OK {
            return Err(HwInitError::TimerInitFailed(ret));
        }
        let ret = esp_timer_start_periodic(ACT_TIMER, period_us);
        if ret != ESP_OK {
            return Err(HwInitError::TimerInitFailed(ret));
        }
    }

    info!("hw_timer: actuation tick started @ {} ms", base_tick_ms);
    Ok(())
}

/// Host/sim variant: a sleeping thread provides the base-tick cadence.
#[cfg(not(target_os = "espidf"))]
pub fn start_actuation_timer<P>(
    mut actuator: PeriodicTickActuator<P>,
) -> Result<(), HwInitError>
where
    P: crate::app::ports::IndicatorPort + Send + 'static,
{
    let period = std::time::Duration::from_millis(u64::from(actuator.base_tick_ms()));
    std::thread::Builder::new()
        .name("act-tick".into())
        .spawn(move || loop {
            std::thread::sleep(period);
            actuator.on_tick();
        })
        .map_err(|_| HwInitError::TimerInitFailed(-1))?;

    log::info!("hw_timer(sim): actuation tick thread @ {:?}", period);
    Ok(())
}
