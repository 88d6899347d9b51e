//! Message assembler (C8): deserializes a 2-cell message BoC into a
//! signing preimage, validating the source address and the header's
//! `input_id` tag along the way.
//!
//! The reference implementation decodes each big-endian header field into
//! a native (little-endian host) integer and then reverses its in-memory
//! byte order to re-emit the original big-endian bytes (`le_to_be`). Our
//! `BitSlice::get_next_int` already yields the big-endian-interpreted
//! value directly, so `u64::to_be_bytes`/`u32::to_be_bytes` reproduce the
//! same wire bytes without that intermediate step.

use super::bitslice::BitSlice;
use super::boc::CellTable;
use super::error::{EngineError, Result};
use super::hash::hash_cells;
use super::sha::Sha256;

const INPUT_ID: u32 = 0x315E_F935;
const ADDRESS_LENGTH: usize = 32;
const MAX_AMOUNT_LENGTH: usize = 15;
const TO_SIGN_CAPACITY: usize = 86;
const AMOUNT_SCALE: u128 = 1_000_000_000;

/// Digest and display strings ready for an external signer and for
/// confirmation UI, the output of [`prepare_to_sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignPreimage {
    pub digest: [u8; 32],
    pub destination: String,
    pub amount_display: String,
}

/// Mirrors `deserialize_array`: copies `out_len` bytes starting at bit
/// offset `offset_bits` into `data`, realigning across the sub-byte shift
/// when the offset isn't byte-aligned.
fn deserialize_array(data: &[u8], offset_bits: usize, out_len: usize) -> Result<Vec<u8>> {
    let shift = offset_bits % 8;
    let first_byte = offset_bits / 8;

    if shift == 0 {
        let end = first_byte + out_len;
        if end > data.len() {
            return Err(EngineError::invalid_data("array deserialization out of range"));
        }
        return Ok(data[first_byte..end].to_vec());
    }

    if first_byte + out_len >= data.len() {
        return Err(EngineError::invalid_data("array deserialization out of range"));
    }

    let mut out = vec![0u8; out_len];
    for j in 0..out_len {
        let i = first_byte + j;
        out[j] = data[i] << shift;
        if j == out_len - 1 {
            out[j] |= data[i + 1] >> (8 - shift);
        }
        if i != first_byte {
            out[j - 1] |= data[i] >> (8 - shift);
        }
    }
    Ok(out)
}

/// Reads a typed address (`type=2`, anycast ignored) from `slice`,
/// returning its 32 raw bytes and signed workchain byte.
fn deserialize_address(slice: &mut BitSlice) -> Result<([u8; ADDRESS_LENGTH], i8)> {
    let address_type = slice.get_next_int(2)?;
    if address_type != 2 {
        return Err(EngineError::invalid_data("unsupported address type"));
    }
    let _anycast = slice.get_next_bit()?;
    let wc = slice.get_next_byte()? as i8;

    let offset = slice.cursor_bits();
    let bytes = deserialize_array(slice.raw_data(), offset, ADDRESS_LENGTH)?;
    let mut address = [0u8; ADDRESS_LENGTH];
    address.copy_from_slice(&bytes);
    slice.move_by(ADDRESS_LENGTH * 8)?;

    Ok((address, wc))
}

/// Reads the destination address and appends its preimage encoding
/// (`0x80>>5` type/anycast prefix, workchain byte, address with completion
/// tag) to `to_sign`. Returns the `"<wc>:<hex>"` display string.
fn append_dst_address(slice: &mut BitSlice, to_sign: &mut BitSlice) -> Result<String> {
    let (address, wc) = deserialize_address(slice)?;

    to_sign.append(&[0x80], 3, false)?;
    to_sign.append(&[wc as u8], 8, false)?;
    to_sign.append(&address, ADDRESS_LENGTH * 8, true)?;

    Ok(format!("{}:{}", wc, hex::encode(address)))
}

/// Reads the time/expire/input_id header, validates `input_id`, and
/// appends the three fields (big-endian, 16 bytes) to `to_sign`.
fn deserialize_header(slice: &mut BitSlice, to_sign: &mut BitSlice) -> Result<()> {
    let time = slice.get_next_int(64)?;
    let expire = slice.get_next_int(32)? as u32;
    let input_id = slice.get_next_int(32)? as u32;
    if input_id != INPUT_ID {
        return Err(EngineError::InvalidInputId { expected: INPUT_ID, actual: input_id });
    }

    let mut buf = [0u8; 16];
    buf[0..8].copy_from_slice(&time.to_be_bytes());
    buf[8..12].copy_from_slice(&expire.to_be_bytes());
    buf[12..16].copy_from_slice(&input_id.to_be_bytes());
    to_sign.append(&buf, 128, false)
}

/// Skips the amount cell's leading zero bytes and returns the remaining
/// significant bytes, advancing `slice` past the consumed field.
fn deserialize_amount(slice: &mut BitSlice) -> Result<Vec<u8>> {
    let data = slice.raw_data().to_vec();
    let mut offset_bits = slice.cursor_bits();
    for &byte in &data {
        if byte != 0 {
            break;
        }
        offset_bits += 8;
    }

    let leading_zero_bytes = offset_bits / 8;
    if leading_zero_bytes > MAX_AMOUNT_LENGTH {
        return Err(EngineError::invalid_data("amount has too many leading zero bytes"));
    }
    let amount_length = MAX_AMOUNT_LENGTH - leading_zero_bytes;

    let amount = deserialize_array(&data, offset_bits, amount_length)?;
    slice.move_by(amount_length * 8 + offset_bits - slice.cursor_bits())?;
    Ok(amount)
}

/// Formats a big-endian byte amount (nanotons) as a decimal `TON` string.
fn format_amount(bytes: &[u8]) -> String {
    let mut value: u128 = 0;
    for &b in bytes {
        value = (value << 8) | b as u128;
    }
    let whole = value / AMOUNT_SCALE;
    let frac = value % AMOUNT_SCALE;
    if frac == 0 {
        format!("{whole} TON")
    } else {
        let mut frac_str = format!("{frac:09}");
        while frac_str.ends_with('0') {
            frac_str.pop();
        }
        format!("{whole}.{frac_str} TON")
    }
}

/// Deserializes a 2-cell message BoC, validates its source address and
/// header, and assembles the signing preimage digest plus display
/// strings.
pub fn prepare_to_sign(
    message_bytes: &[u8],
    expected_src_address: &[u8; ADDRESS_LENGTH],
    hasher: &impl Sha256,
) -> Result<SignPreimage> {
    let table = CellTable::parse(message_bytes, 2)?;
    if table.len() != 2 {
        return Err(EngineError::invalid_data("message must contain exactly two cells"));
    }

    let mut to_sign = BitSlice::scratch(TO_SIGN_CAPACITY);
    to_sign.append(&[0x01, 0x63], 16, false)?;

    let cell0 = table.get(0).expect("validated len == 2");
    let mut slice0 = BitSlice::from_cell_payload(cell0.payload())?;
    slice0.move_by(4)?;

    let (src_address, _src_wc) = deserialize_address(&mut slice0)?;
    if &src_address != expected_src_address {
        return Err(EngineError::InvalidSrcAddress);
    }
    slice0.move_by(6)?;

    deserialize_header(&mut slice0, &mut to_sign)?;
    let destination = append_dst_address(&mut slice0, &mut to_sign)?;
    to_sign.move_by(16)?;

    let cell1 = table.get(1).expect("validated len == 2");
    let mut slice1 = BitSlice::from_cell_payload(cell1.payload())?;
    let amount_bytes = deserialize_amount(&mut slice1)?;
    let amount_display = format_amount(&amount_bytes);
    let _bounce = slice1.get_next_bit()?;

    let hashes = hash_cells(&table, hasher, None)?;
    to_sign.append(&hashes[1], 256, false)?;

    let preimage_len = to_sign.cursor_bits() / 8;
    let preimage = &to_sign.raw_data()[..preimage_len];
    let digest = hasher.hash(preimage)?;

    Ok(SignPreimage { digest, destination, amount_display })
}
