//! Port traits — the boundary between the coordination core and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ sampling / actuation core
//! ```
//!
//! Driven adapters (the conversion unit, the indicator pins) implement
//! these traits.  The core consumes them via generics, so it never touches
//! hardware directly and every piece runs on the host under test.

use crate::classify::Indicator;
use crate::error::SamplerError;

// ───────────────────────────────────────────────────────────────
// Conversion port (driven adapter: domain → ADC)
// ───────────────────────────────────────────────────────────────

/// Request side of the conversion peripheral.
///
/// Completion is NOT part of this trait: the hardware answers
/// asynchronously by storing the result in the pipeline's
/// [`SampleCell`](crate::sync::SampleCell) and posting its
/// [`CompletionGate`](crate::sync::CompletionGate).
pub trait ConversionPort {
    /// Command one conversion.  At most one may be outstanding;
    /// [`SamplerError::PeripheralBusy`] if one already is.
    ///
    /// Every accepted request is eventually answered by exactly one gate
    /// post (assuming peripheral health); no post ever occurs without a
    /// preceding accepted request.
    fn start_conversion(&mut self) -> Result<(), SamplerError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → output pins)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the tri-color indicator.
///
/// # Exclusivity contract
///
/// `drive(indicator, on)` asserts that *only* the named indicator may be
/// lit: implementations force every other output inactive before (or
/// atomically with) touching the named one, so no multi-color state is
/// ever observable, even transiently.
pub trait IndicatorPort {
    /// Set the named indicator to `on`, all others inactive.
    /// `Indicator::None` means everything dark regardless of `on`.
    fn drive(&mut self, indicator: Indicator, on: bool);

    /// Force every output inactive.
    fn all_off(&mut self);
}
