//! Deterministic TVC address derivation and message-signing preimage
//! assembly.
//!
//! The two public entry points, [`compute_address`] and
//! [`prepare_to_sign`], are re-entrant and stateless: every call parses
//! its own cell table from the input it's given and returns a fresh
//! result, with no shared mutable state between calls.

pub mod address;
pub mod bitslice;
pub mod boc;
pub mod byte_cursor;
pub mod cell;
pub mod dict;
pub mod error;
pub mod hash;
pub mod keys;
pub mod message;
pub mod sha;
pub mod splice;
#[cfg(test)]
mod tests;

pub use address::format_address_hex;
pub use error::{EngineError, Result};
pub use keys::{PublicKeyProvider, StaticKeyProvider};
pub use message::SignPreimage;
pub use sha::{Sha2Backend, Sha256};

use boc::CellTable;
use dict::{find_public_key_cell, MAX_CONTRACT_CELLS_COUNT};
use hash::hash_cells;
use splice::splice_public_key;

/// Parses `tvc_bytes` as a contract image, splices `keys`'s public key
/// into the dictionary leaf for `account_index`, and returns the
/// resulting 32-byte contract address (the root cell's hash), using the
/// default `sha2`-backed hasher.
pub fn compute_address(
    account_index: u32,
    tvc_bytes: &[u8],
    keys: &impl PublicKeyProvider,
) -> Result<[u8; 32]> {
    compute_address_with_hasher(account_index, tvc_bytes, keys, &Sha2Backend)
}

/// Same as [`compute_address`] with an explicit `Sha256` collaborator,
/// for callers that need a different hash primitive (e.g. a
/// hardware-backed one).
pub fn compute_address_with_hasher(
    account_index: u32,
    tvc_bytes: &[u8],
    keys: &impl PublicKeyProvider,
    hasher: &impl Sha256,
) -> Result<[u8; 32]> {
    let table = CellTable::parse(tvc_bytes, MAX_CONTRACT_CELLS_COUNT)?;
    if table.is_empty() {
        return Err(EngineError::invalid_data("empty cell table"));
    }

    let entry = find_public_key_cell(&table)?;
    if entry.cell_index == 0 || entry.label_size_bits == 0 {
        return Err(EngineError::CellIsEmpty);
    }

    let leaf = table
        .get(entry.cell_index as usize)
        .ok_or_else(|| EngineError::invalid_data("public key cell missing from table"))?;
    let public_key = keys.public_key(account_index);
    let spliced = splice_public_key(leaf, entry.label_size_bits, &public_key)?;

    let hashes = hash_cells(&table, hasher, Some((entry.cell_index, &spliced)))?;
    Ok(hashes[0])
}

/// Deserializes a 2-cell message BoC, validates its source address and
/// header, and assembles the signing preimage digest plus display
/// strings, using the default `sha2`-backed hasher.
pub fn prepare_to_sign(message_bytes: &[u8], expected_src_address: &[u8; 32]) -> Result<SignPreimage> {
    prepare_to_sign_with_hasher(message_bytes, expected_src_address, &Sha2Backend)
}

/// Same as [`prepare_to_sign`] with an explicit `Sha256` collaborator.
pub fn prepare_to_sign_with_hasher(
    message_bytes: &[u8],
    expected_src_address: &[u8; 32],
    hasher: &impl Sha256,
) -> Result<SignPreimage> {
    message::prepare_to_sign(message_bytes, expected_src_address, hasher)
}

