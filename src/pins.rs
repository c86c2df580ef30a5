//! GPIO / peripheral pin assignments for the Voltband main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Band input — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Monitored voltage input via resistive divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const BAND_ADC_GPIO: i32 = 5;
/// ADC1 channel number for the band input.
pub const BAND_ADC_CH: u32 = 4;

// ---------------------------------------------------------------------------
// Tri-color indicator (discrete LEDs, active HIGH)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// UART debug console
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
