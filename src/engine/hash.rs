//! Hash engine (C7): bottom-up SHA-256 over each cell's header, payload
//! (possibly overridden), and children's depths and hashes.

use super::boc::CellTable;
use super::error::{EngineError, Result};
use super::sha::Sha256;

const HASH_SIZE: usize = 32;

/// Computes every cell's hash in strictly descending index order (cell
/// `N-1` down to `0`) so each step already has its children's hashes and
/// depths available. `override_cell` optionally substitutes the payload
/// used for one cell index (the public-key leaf) while keeping its
/// original `data_size` as the number of bytes read back from it.
pub fn hash_cells(
    table: &CellTable,
    hasher: &impl Sha256,
    override_cell: Option<(u8, &[u8])>,
) -> Result<[[u8; HASH_SIZE]; 16]> {
    let count = table.len();
    let mut hashes = [[0u8; HASH_SIZE]; 16];
    let mut depths = vec![0u8; count];

    for i in (0..count).rev() {
        let cell = table
            .get(i)
            .ok_or_else(|| EngineError::invalid_data("cell table index out of range"))?;

        let mut buf = Vec::with_capacity(2 + cell.data_size() + cell.refs().len() * (2 + HASH_SIZE));
        buf.push(cell.d1());
        buf.push(cell.d2());

        let payload: &[u8] = match override_cell {
            Some((idx, data)) if idx as usize == i && idx != 0 => &data[..cell.data_size()],
            _ => cell.payload(),
        };
        buf.extend_from_slice(payload);

        let refs = cell.refs();
        for &r in refs {
            if r as usize >= count {
                return Err(EngineError::invalid_data("reference out of range"));
            }
        }
        for &r in refs {
            let child_depth = depths[r as usize];
            let new_depth = child_depth.saturating_add(1);
            if new_depth > depths[i] {
                depths[i] = new_depth;
            }
            buf.push(0x00);
            buf.push(child_depth);
        }
        for &r in refs {
            buf.extend_from_slice(&hashes[r as usize]);
        }

        let digest = hasher.hash(&buf)?;
        hashes[i] = digest;
    }

    Ok(hashes)
}

/// Convenience wrapper returning just the root's hash (the address).
pub fn root_hash(table: &CellTable, hasher: &impl Sha256, override_cell: Option<(u8, &[u8])>) -> Result<[u8; HASH_SIZE]> {
    let hashes = hash_cells(table, hasher, override_cell)?;
    Ok(hashes[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::boc::CellTable;
    use crate::engine::sha::Sha2Backend;

    fn single_cell_boc(cell_bytes: &[u8]) -> Vec<u8> {
        let mut b = vec![0xb5, 0xee, 0x9c, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00];
        b.extend_from_slice(cell_bytes);
        b
    }

    #[test]
    fn leaf_hash_matches_direct_sha256() {
        let cell_bytes = [0x00u8, 0x02, 0xaa, 0xbb];
        let boc = single_cell_boc(&cell_bytes);
        let table = CellTable::parse(&boc, 16).unwrap();
        let hasher = Sha2Backend;
        let hashes = hash_cells(&table, &hasher, None).unwrap();

        let expected = hasher.hash(&[0x00, 0x02, 0xaa, 0xbb]).unwrap();
        assert_eq!(hashes[0], expected);
    }

    #[test]
    fn parent_hash_includes_child_depth_and_hash() {
        let mut boc = vec![
            0xb5, 0xee, 0x9c, 0x72, 0x01, 0x01, 0x02, 0x01, 0x00, 0x00, 0x00,
        ];
        boc.extend_from_slice(&[0x01, 0x00, 0x01]); // cell 0: 1 ref -> 1, no payload
        boc.extend_from_slice(&[0x00, 0x00]); // cell 1: leaf, no payload
        let table = CellTable::parse(&boc, 16).unwrap();
        let hasher = Sha2Backend;
        let hashes = hash_cells(&table, &hasher, None).unwrap();

        let child_hash = hasher.hash(&[0x00, 0x00]).unwrap();
        let mut expected_preimage = vec![0x01u8, 0x00, 0x00, 0x01];
        expected_preimage.extend_from_slice(&child_hash);
        let expected_root = hasher.hash(&expected_preimage).unwrap();
        assert_eq!(hashes[0], expected_root);
    }

    #[test]
    fn override_substitutes_payload_for_non_root_cell() {
        let mut boc = vec![
            0xb5, 0xee, 0x9c, 0x72, 0x01, 0x01, 0x02, 0x01, 0x00, 0x00, 0x00,
        ];
        boc.extend_from_slice(&[0x01, 0x00, 0x01]);
        boc.extend_from_slice(&[0x00, 0x02, 0xaa, 0xbb]); // cell 1 original payload
        let table = CellTable::parse(&boc, 16).unwrap();
        let hasher = Sha2Backend;

        let overridden_data = [0xccu8, 0xdd, 0xff, 0xff];
        let hashes = hash_cells(&table, &hasher, Some((1, &overridden_data))).unwrap();
        let expected_child = hasher.hash(&[0x00, 0xcc, 0xdd]).unwrap();
        assert_eq!(hashes[1], expected_child);
    }

    #[test]
    fn rejects_reference_equal_to_cells_count_instead_of_panicking() {
        // Cell::parse accepts cell_index < ref <= cells_count, so the last
        // cell referencing an index equal to cells_count parses cleanly but
        // must fail here rather than index past the depths/hashes tables.
        let mut boc = vec![
            0xb5, 0xee, 0x9c, 0x72, 0x01, 0x01, 0x03, 0x01, 0x00, 0x00, 0x00,
        ];
        boc.extend_from_slice(&[0x01, 0x00, 0x01]);
        boc.extend_from_slice(&[0x01, 0x00, 0x02]);
        boc.extend_from_slice(&[0x01, 0x00, 0x03]);
        let table = CellTable::parse(&boc, 16).unwrap();
        let hasher = Sha2Backend;
        assert!(hash_cells(&table, &hasher, None).is_err());
    }
}
