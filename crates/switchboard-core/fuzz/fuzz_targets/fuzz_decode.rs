#![no_main]
use libfuzzer_sys::fuzz_target;
use switchboard_core::codec::{decode, encode};

fuzz_target!(|data: &[u8]| {
    // Must not panic -- returning Err is fine.
    if let Ok(circuit) = decode(data) {
        // Anything strict decoding accepts must encode again, unless it holds
        // duplicate positions.
        let _ = encode(&circuit);
    }
});
