//! The coordination core: sampling loop, blink stepping, and the two
//! actuation strategies, all hardware-agnostic behind the port traits.

pub mod actuation;
pub mod blink;
pub mod ports;
pub mod sampling;
