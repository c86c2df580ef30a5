//! Fuzz the band classifier: any 16-bit input must map to exactly one
//! spec from the compiled-in table, with first-match-wins semantics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use voltband::classify::{classify, BANDS, FALLBACK};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let sample = u16::from_le_bytes([data[0], data[1]]);

    let spec = classify(sample);

    // Must equal the first band whose range contains the sample, or the
    // fallback when none does.
    let expected = BANDS
        .iter()
        .find(|b| sample >= b.lower && sample < b.upper)
        .map(|b| b.spec)
        .unwrap_or(FALLBACK);

    assert_eq!(spec, expected);
});
