//! Guarding untrusted payloads before they reach the decoder.
//!
//! The codec does no size limiting of its own, so callers bound the
//! decompressed input first. Undoing the outer text-safe encoding and
//! compression layers is the transport's job; this module starts from the
//! decompressed bytes.

use crate::codec::{DecodeMode, Decoded, decode_with_mode};
use crate::error::DecodeError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Largest decompressed payload accepted by default.
pub const DEFAULT_MAX_DECODED_BYTES: usize = 100_000;

/// Errors raised while accepting a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("data size \"{size}\" too big to render (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Size policy applied to decompressed payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadLimits {
    pub max_decoded_bytes: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }
}

impl PayloadLimits {
    pub fn new(max_decoded_bytes: usize) -> Self {
        Self { max_decoded_bytes }
    }

    /// Reject payloads longer than the limit. A payload exactly at the limit
    /// is accepted.
    pub fn check(&self, size: usize) -> Result<(), PayloadError> {
        if size > self.max_decoded_bytes {
            return Err(PayloadError::TooLarge {
                size,
                limit: self.max_decoded_bytes,
            });
        }
        Ok(())
    }
}

/// Check the payload size, then decode it.
///
/// In lenient mode a header mismatch comes back as
/// `Ok(Decoded::InvalidHeader { .. })`.
pub fn decode_guarded(
    data: &[u8],
    limits: &PayloadLimits,
    mode: DecodeMode,
) -> Result<Decoded, PayloadError> {
    limits.check(data.len())?;
    let decoded = decode_with_mode(data, mode)?;
    if let Decoded::Circuit(circuit) = &decoded {
        debug!(
            "accepted payload {} ({} bytes, {} cells)",
            payload_digest(data),
            data.len(),
            circuit.cells.len()
        );
    }
    Ok(decoded)
}

/// Public name of a payload: the MD5 of its decompressed bytes, as 32 hex
/// digits. Matches the ids already handed out for rendered circuits.
pub fn circuit_id(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

/// Cheap identifier for log lines: 64-bit FNV-1a as 16 hex digits.
pub fn payload_digest(data: &[u8]) -> String {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in data {
        hash = (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("{hash:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Circuit;
    use crate::codec::encode;

    #[test]
    fn default_limit_is_100k() {
        assert_eq!(PayloadLimits::default().max_decoded_bytes, 100_000);
    }

    #[test]
    fn check_accepts_up_to_limit() {
        let limits = PayloadLimits::new(10);
        assert!(limits.check(0).is_ok());
        assert!(limits.check(10).is_ok());
        assert_eq!(
            limits.check(11),
            Err(PayloadError::TooLarge { size: 11, limit: 10 })
        );
    }

    #[test]
    fn too_large_message_embeds_size() {
        let err = PayloadLimits::default().check(123_456).unwrap_err();
        assert_eq!(
            err.to_string(),
            "data size \"123456\" too big to render (limit 100000 bytes)"
        );
    }

    #[test]
    fn guarded_decode_checks_size_first() {
        let bytes = encode(&Circuit::empty()).unwrap();
        let limits = PayloadLimits::new(bytes.len() - 1);
        assert!(matches!(
            decode_guarded(&bytes, &limits, DecodeMode::Lenient),
            Err(PayloadError::TooLarge { .. })
        ));
        let limits = PayloadLimits::new(bytes.len());
        assert_eq!(
            decode_guarded(&bytes, &limits, DecodeMode::Strict),
            Ok(Decoded::Circuit(Circuit::empty()))
        );
    }

    #[test]
    fn guarded_lenient_decode_reports_bad_header() {
        let result = decode_guarded(b"junk data", &PayloadLimits::default(), DecodeMode::Lenient);
        assert_eq!(result, Ok(Decoded::InvalidHeader { found: 0x6A75_6E6B }));

        // The size check still comes first.
        let result = decode_guarded(b"junk data", &PayloadLimits::new(4), DecodeMode::Lenient);
        assert!(matches!(result, Err(PayloadError::TooLarge { size: 9, limit: 4 })));
    }

    #[test]
    fn guarded_decode_propagates_strict_errors() {
        let result = decode_guarded(&[1, 2, 3, 4], &PayloadLimits::default(), DecodeMode::Strict);
        assert!(matches!(
            result,
            Err(PayloadError::Decode(DecodeError::InvalidHeader { found: 0x0102_0304 }))
        ));
    }

    #[test]
    fn circuit_id_is_md5_hex() {
        assert_eq!(circuit_id(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(circuit_id(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(circuit_id(&encode(&Circuit::empty()).unwrap()).len(), 32);
    }

    #[test]
    fn digest_is_fnv1a_64() {
        assert_eq!(payload_digest(b""), "cbf29ce484222325");
        assert_eq!(payload_digest(b"a"), "af63dc4c8601ec8c");
        assert_ne!(payload_digest(b"ab"), payload_digest(b"ba"));
    }
}
