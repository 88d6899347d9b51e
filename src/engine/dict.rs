//! Dictionary descent: locates the all-zero 64-bit key in a HashmapE-style
//! trie rooted under cell 0, using label-compressed ("short-long-same"
//! form) edges.

use super::bitslice::BitSlice;
use super::boc::CellTable;
use super::cell::MAX_REFERENCES_COUNT;
use super::error::{EngineError, Result};

pub const MAX_CONTRACT_CELLS_COUNT: u8 = 16;
const KEY_BITS: u16 = 64;

/// Where the public key lives once descent succeeds: the cell holding the
/// leaf and how many leading bits of its payload are label header (and
/// must be skipped before the 256 key bits begin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictEntry {
    pub cell_index: u8,
    pub label_size_bits: u8,
}

/// Decodes a short-long-same label at the current cursor of `slice` into
/// `label`, bounded by `max` remaining key bits. Mirrors `get_label`.
fn decode_label(slice: &mut BitSlice, max: u16, label: &mut BitSlice) -> Result<()> {
    if slice.is_empty() {
        return Err(EngineError::SliceEmpty);
    }
    if !slice.get_next_bit()? {
        return Err(EngineError::WrongLabel);
    }
    if !slice.get_next_bit()? {
        return Err(EngineError::WrongLabel);
    }

    let value = if slice.get_next_bit()? { 0xffu8 } else { 0u8 };
    let length = slice.get_next_size(max)?;
    if length > 64 {
        return Err(EngineError::range_check("label length exceeds 64 bits"));
    }
    let length_bytes = (length as usize).div_ceil(8);
    label.fill(value, length_bytes)?;
    label.truncate(length as usize)?;
    Ok(())
}

/// Finds cell 0's data-root, then descends from its first child to locate
/// the all-zero-key leaf. Returns the leaf's cell index and label size.
pub fn find_public_key_cell(table: &CellTable) -> Result<DictEntry> {
    let root = table.get(0).ok_or_else(|| EngineError::invalid_data("missing root cell"))?;
    let root_payload = root.payload();
    if root_payload.is_empty() || root_payload[0] & 0x20 == 0 {
        return Err(EngineError::invalid_data("root cell has no data branch"));
    }

    let root_refs = root.refs();
    if root_refs.is_empty() || root_refs.len() > 2 {
        return Err(EngineError::invalid_data("unexpected root reference count"));
    }
    let data_root_index = *root_refs.last().unwrap();
    if data_root_index == 0 || data_root_index > MAX_CONTRACT_CELLS_COUNT {
        return Err(EngineError::invalid_data("data-root index out of range"));
    }
    let data_root = table
        .get(data_root_index as usize)
        .ok_or_else(|| EngineError::invalid_data("data-root cell missing"))?;
    let data_root_refs = data_root.refs();
    if data_root_refs.is_empty() || data_root_refs.len() > MAX_REFERENCES_COUNT as usize {
        return Err(EngineError::invalid_data("data-root has no entry reference"));
    }

    let mut cell_index = data_root_refs[0];
    let mut key = BitSlice::init(vec![0u8; 8], 8)?;
    let mut remaining_key_bits = KEY_BITS;

    loop {
        if cell_index == 0 || cell_index > MAX_CONTRACT_CELLS_COUNT {
            return Err(EngineError::invalid_data("descent cell index out of range"));
        }
        let cell = table
            .get(cell_index as usize)
            .ok_or_else(|| EngineError::invalid_data("descent cell missing"))?;

        let mut slice = BitSlice::from_cell_payload(cell.payload())?;
        let mut label = BitSlice::scratch(8);
        decode_label(&mut slice, remaining_key_bits, &mut label)?;

        if label.equal(&key)? {
            let len = (16 - (remaining_key_bits).leading_zeros()) as u8;
            let label_size_bits = 2 + 1 + len;
            return Ok(DictEntry { cell_index, label_size_bits });
        }

        let max_prefix_len = label.remaining_bits().min(key.remaining_bits());
        let mut i = 0usize;
        while i < max_prefix_len && label.get_bits(i, 1)? == key.get_bits(i, 1)? {
            i += 1;
        }
        key.move_by(i)?;
        label.truncate(i)?;
        let label_rb = label.remaining_bits() as u16;
        if remaining_key_bits < label_rb {
            return Err(EngineError::CellUnderflow);
        }
        remaining_key_bits -= label_rb;
        if remaining_key_bits < 1 {
            return Err(EngineError::CellUnderflow);
        }

        let next_index = key.get_next_bit()?;
        if next_index {
            return Err(EngineError::InvalidKey);
        }
        remaining_key_bits -= 1;

        let refs = cell.refs();
        if refs.is_empty() || refs.len() > MAX_REFERENCES_COUNT as usize {
            return Err(EngineError::invalid_data("descent node has no branches"));
        }
        let next_cell = refs[0];
        if next_cell == 0 || next_cell > MAX_CONTRACT_CELLS_COUNT {
            return Err(EngineError::invalid_data("descent target out of range"));
        }
        cell_index = next_cell;
    }
}
