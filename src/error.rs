#![allow(dead_code)] // Top-level Error reserved for typed returns beyond the sampler path

//! Unified error types for the Voltband firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! top-level error handling uniform.  All variants are `Copy` so they can be
//! cheaply passed across task boundaries without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The sampling pipeline failed.
    Sampler(SamplerError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampler(e) => write!(f, "sampler: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sampler errors
// ---------------------------------------------------------------------------

/// Failures of the conversion pipeline.  Neither variant is fatal: `Busy` is
/// recovered locally by the sampling loop (yield and retry), `Timeout` is
/// detectable-but-unhandled (logged, outputs keep their last valid state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    /// A conversion was requested while one is still in flight.
    PeripheralBusy,
    /// No completion signal arrived within the configured bound.
    ConversionTimeout,
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeripheralBusy => write!(f, "conversion already in flight"),
            Self::ConversionTimeout => write!(f, "conversion completion timed out"),
        }
    }
}

impl From<SamplerError> for Error {
    fn from(e: SamplerError) -> Self {
        Self::Sampler(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
