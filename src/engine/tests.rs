//! End-to-end coverage of the two public entry points, built from
//! hand-assembled BoC byte streams (no external fixtures, no toolchain
//! round-trip through a serializer).

use super::*;
use crate::engine::keys::StaticKeyProvider;

fn boc_header(cells_count: u8) -> Vec<u8> {
    vec![
        0xb5, 0xee, 0x9c, 0x72, 0x01, 0x01, cells_count, 0x01, 0x00, 0x00, 0x00,
    ]
}

/// root (data-branch cell 0) -> data root (cell 1) -> leaf (cell 2) with a
/// full 64-bit label, matching scenario 3 of spec.md §8 (key-splicing).
fn sample_tvc() -> Vec<u8> {
    let mut bytes = boc_header(3);
    bytes.extend_from_slice(&[0x01, 0x02, 0x20, 0x01]);
    bytes.extend_from_slice(&[0x01, 0x00, 0x02]);
    let mut leaf_payload = vec![0xD0u8, 0x00]; // label "11 0 1000000" (length=64)
    leaf_payload.extend_from_slice(&[0u8; 32]);
    leaf_payload.push(0x00);
    let d2 = (leaf_payload.len() as u8) * 2;
    bytes.push(0x00);
    bytes.push(d2);
    bytes.extend_from_slice(&leaf_payload);
    bytes
}

#[test]
fn compute_address_yields_32_bytes_deterministically() {
    let keys = StaticKeyProvider([0x11u8; 32]);
    let tvc = sample_tvc();

    let a = compute_address(1, &tvc, &keys).unwrap();
    let b = compute_address(1, &tvc, &keys).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
}

#[test]
fn compute_address_rejects_empty_input() {
    let keys = StaticKeyProvider([0u8; 32]);
    assert!(compute_address(0, &[], &keys).is_err());
}

#[test]
fn compute_address_changes_with_the_spliced_key() {
    let tvc = sample_tvc();
    let a = compute_address(1, &tvc, &StaticKeyProvider([0x11u8; 32])).unwrap();
    let b = compute_address(1, &tvc, &StaticKeyProvider([0x22u8; 32])).unwrap();
    assert_ne!(a, b);
}

#[test]
fn rejects_cells_count_over_sixteen() {
    let bytes = boc_header(17);
    let keys = StaticKeyProvider([0u8; 32]);
    assert_eq!(
        compute_address(0, &bytes, &keys).unwrap_err(),
        EngineError::InvalidData("too many cells".into())
    );
}

#[test]
fn rejects_label_not_in_short_long_form() {
    let mut bytes = boc_header(3);
    bytes.extend_from_slice(&[0x01, 0x02, 0x20, 0x01]);
    bytes.extend_from_slice(&[0x01, 0x00, 0x02]);
    // leaf label starts "10" instead of "11" -> WrongLabel
    let mut leaf_payload = vec![0x80u8, 0x00];
    leaf_payload.extend_from_slice(&[0u8; 32]);
    leaf_payload.push(0x00);
    let d2 = (leaf_payload.len() as u8) * 2;
    bytes.push(0x00);
    bytes.push(d2);
    bytes.extend_from_slice(&leaf_payload);

    let keys = StaticKeyProvider([0u8; 32]);
    assert_eq!(compute_address(0, &bytes, &keys).unwrap_err(), EngineError::WrongLabel);
}

fn pack_bits(spec: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut acc = 0u8;
    let mut n = 0u8;
    for c in spec.chars() {
        if c == ' ' {
            continue;
        }
        acc = (acc << 1) | (c as u8 - b'0');
        n += 1;
        if n == 8 {
            bytes.push(acc);
            acc = 0;
            n = 0;
        }
    }
    if n > 0 {
        acc <<= 8 - n;
        bytes.push(acc);
    }
    bytes
}

/// Builds a 2-cell message BoC: cell 0 carries the reserved bits, a
/// type-2 source address matching `src`, a valid header, and a type-2
/// destination address; cell 1 carries a 1-TON amount and a bounce bit.
fn sample_message(src: &[u8; 32]) -> Vec<u8> {
    let mut bits = String::new();
    bits.push_str("0000"); // 4 reserved bits
    bits.push_str("10"); // src address type = 2
    bits.push('0'); // anycast
    bits.push_str("00000000"); // wc = 0
    for byte in src {
        bits.push_str(&format!("{byte:08b}"));
    }
    bits.push_str(&"0".repeat(6)); // reserved
    bits.push_str(&"0".repeat(64)); // time
    bits.push_str(&"0".repeat(32)); // expire
    bits.push_str(&format!("{:032b}", 0x315E_F935u32)); // input_id
    bits.push_str("10"); // dst address type = 2
    bits.push('0'); // anycast
    bits.push_str("00000001"); // wc = 1
    for b in [0xAAu8; 32] {
        bits.push_str(&format!("{b:08b}"));
    }
    let payload0 = pack_bits(&bits);

    let mut boc = boc_header(2);
    let d2_0 = (payload0.len() as u8) * 2;
    boc.push(0x00);
    boc.push(d2_0);
    boc.extend_from_slice(&payload0);

    // cell 1: 1 TON amount (0x3B9ACA00) with no leading zero bytes beyond
    // what MAX_AMOUNT_LENGTH implies, then a bounce bit.
    let mut amount_bits = String::new();
    amount_bits.push_str(&"0".repeat(8 * 11)); // leading zero bytes
    amount_bits.push_str("00111011100110101100101000000000"); // 0x3B9ACA00
    amount_bits.push('1'); // bounce bit
    let payload1 = pack_bits(&amount_bits);
    let d2_1 = (payload1.len() as u8) * 2;
    boc.push(0x00);
    boc.push(d2_1);
    boc.extend_from_slice(&payload1);

    boc
}

#[test]
fn prepare_to_sign_accepts_matching_source_and_formats_amount() {
    let src = [0u8; 32];
    let message = sample_message(&src);

    let preimage = prepare_to_sign(&message, &src).unwrap();
    assert_eq!(preimage.destination, format!("1:{}", hex::encode([0xAAu8; 32])));
    assert_eq!(preimage.amount_display, "1 TON");
    assert_eq!(preimage.digest.len(), 32);
}

#[test]
fn prepare_to_sign_rejects_mismatched_source() {
    let src = [0u8; 32];
    let message = sample_message(&src);

    let wrong = [0xFFu8; 32];
    assert_eq!(
        prepare_to_sign(&message, &wrong).unwrap_err(),
        EngineError::InvalidSrcAddress
    );
}
