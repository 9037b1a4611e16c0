#![no_main]
use libfuzzer_sys::fuzz_target;
use switchboard_core::codec::decode_lenient;
use switchboard_core::payload::PayloadLimits;

fuzz_target!(|data: &[u8]| {
    // Feed size-guarded bytes to the lenient decoder. Must not panic.
    if PayloadLimits::default().check(data.len()).is_ok() {
        let _ = decode_lenient(data);
    }
});
