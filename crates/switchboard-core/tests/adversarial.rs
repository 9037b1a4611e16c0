//! Adversarial input tests for the circuit decoders.
//!
//! Malformed streams should either return errors (strict) or degrade to
//! partial values (lenient), never panic.

use proptest::prelude::*;
use switchboard_core::codec::{HEADER, decode, decode_lenient, encode};
use switchboard_core::test_utils::*;
use switchboard_core::{Circuit, DecodeError, Decoded};

fn header_bytes() -> Vec<u8> {
    HEADER.to_be_bytes().to_vec()
}

/// Any 4-byte prefix other than the magic is rejected in both modes.
#[test]
fn wrong_header_variants() {
    for bad in [
        [0x00, 0x00, 0x00, 0x00],
        [0x01, 0x00, 0x57, 0x53], // little-endian magic
        [0x53, 0x57, 0x00, 0x02], // a different format version
        [0xFF, 0xFF, 0xFF, 0xFF],
    ] {
        let mut bytes = bad.to_vec();
        bytes.extend_from_slice(&SINGLE_CELL_BYTES[4..]);
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::InvalidHeader { .. })
        ));
        assert_eq!(
            decode_lenient(&bytes),
            Decoded::InvalidHeader {
                found: u32::from_be_bytes(bad)
            }
        );
    }
}

/// Header only, no grid size.
#[test]
fn header_without_grid_size() {
    let bytes = header_bytes();
    assert!(matches!(decode(&bytes), Err(DecodeError::Truncated { .. })));
    // Lenient reads the missing grid size as zeros; the header still counts.
    assert_eq!(decode_lenient(&bytes), Decoded::Circuit(Circuit::empty()));
}

/// Every prefix of a valid stream is handled without panicking.
#[test]
fn every_truncation_point() {
    let bytes = encode(&dense_circuit(5, 4)).unwrap();
    for len in 0..bytes.len() {
        let prefix = &bytes[..len];
        let _ = decode(prefix);
        let lenient = decode_lenient(prefix);
        assert_eq!(lenient.is_invalid_header(), len < 4);
        assert!(lenient.circuit().map_or(0, Circuit::len) <= 20);
    }
}

/// Continuation bits that never end.
#[test]
fn endless_varint_in_grid_size() {
    let mut bytes = header_bytes();
    bytes.extend(std::iter::repeat_n(0xFF, 64));
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::VarintOverflow { groups: 5 })
    );
    // Lenient mode runs off the end and stops on the zero group.
    let lenient = decode_lenient(&bytes).into_circuit().unwrap();
    assert!(lenient.cells.is_empty());
}

/// A trailing byte after a complete stream is decoded as a garbage cell in
/// lenient mode and rejected in strict mode.
#[test]
fn trailing_garbage_byte() {
    let mut bytes = SINGLE_CELL_BYTES.to_vec();
    bytes.push(0x04);
    assert!(matches!(decode(&bytes), Err(DecodeError::Truncated { .. })));

    let lenient = decode_lenient(&bytes).into_circuit().unwrap();
    assert_eq!(lenient.cells.len(), 2);
    assert_eq!(lenient.cells[0], single_cell_circuit().cells[0]);
    // dx = zigzag(4) = 2, every other field reads zero.
    assert_eq!(lenient.cells[1].position.x, 3);
    assert_eq!(lenient.cells[1].position.y, 1);
}

/// Streams whose cells were not written in canonical order still decode to
/// whatever the deltas say.
#[test]
fn non_canonical_stream_decodes_as_written() {
    let mut bytes = header_bytes();
    bytes.extend_from_slice(&[0x04, 0x04]); // 2x2
    // cell 1 at (1, 0), cell 2 at (0, 0): dx = -1
    bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);
    let circuit = decode(&bytes).unwrap();
    assert_eq!(circuit.cells.len(), 2);
    assert_eq!(circuit.cells[0].position.x, 1);
    assert_eq!(circuit.cells[1].position.x, 0);
    assert!(!circuit.is_canonical());

    // Re-encoding canonicalizes, so the bytes differ.
    assert_ne!(encode(&circuit).unwrap(), bytes);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Random bytes never panic either decoder.
    #[test]
    fn random_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&data);
        let _ = decode_lenient(&data);
    }

    /// Random bodies after a valid header never panic either decoder.
    #[test]
    fn random_body_never_panics(body in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut data = header_bytes();
        data.extend(body);
        let _ = decode(&data);
        let _ = decode_lenient(&data);
    }
}
