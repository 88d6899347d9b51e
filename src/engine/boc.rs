//! Bag-of-Cells framing parser.
//!
//! Walks the flat, single-root BoC encoding described in the reference
//! app's `deserialize_cells_tree`: a fixed header, then `cells_count`
//! cells laid out back to back with forward-only one-byte references.

use super::byte_cursor::ByteCursor;
use super::cell::Cell;
use super::error::{EngineError, Result};

const BOC_GENERIC_TAG: u32 = 0xB5EE_9C72;
const MAX_ROOTS_COUNT: u8 = 1;

/// Parsed cell table: an ordered, forward-referencing DAG of up to
/// `max_cells` cells with cell 0 as the single root.
pub struct CellTable<'a> {
    cells: Vec<Cell<'a>>,
}

impl<'a> CellTable<'a> {
    /// Parses `bytes` as a BoC blob, rejecting anything but the plain
    /// single-root, single-byte-ref, non-indexed, non-CRC framing. `max_cells`
    /// bounds `cells_count` (16 for contract images, 2 for messages).
    pub fn parse(bytes: &'a [u8], max_cells: u8) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let magic = cursor.read_u32_be()?;
        if magic != BOC_GENERIC_TAG {
            return Err(EngineError::invalid_data("bad BoC magic"));
        }

        let first_byte = cursor.read_byte()?;
        let index_included = first_byte & 0x80 != 0;
        let has_crc = first_byte & 0x40 != 0;
        let has_cache_bits = first_byte & 0x20 != 0;
        if index_included || has_crc || has_cache_bits {
            return Err(EngineError::invalid_data("unsupported BoC flags"));
        }
        let ref_size = first_byte & 0x7;
        if ref_size != 1 {
            return Err(EngineError::invalid_data("unsupported ref size"));
        }

        let offset_size = cursor.read_byte()?;
        if offset_size == 0 || offset_size > 8 {
            return Err(EngineError::invalid_data("bad offset size"));
        }

        let cells_count = cursor.read_byte()?;
        let roots_count = cursor.read_byte()?;
        if roots_count != MAX_ROOTS_COUNT {
            return Err(EngineError::invalid_data("unsupported roots count"));
        }
        if cells_count > max_cells {
            return Err(EngineError::invalid_data("too many cells"));
        }

        let _absent_count = cursor.read_byte()?;
        let _total_cells_size = cursor.read_bytes(offset_size as usize)?;
        let _root_indices = cursor.read_bytes(roots_count as usize * ref_size as usize)?;

        let mut cells = Vec::with_capacity(cells_count as usize);
        for i in 0..cells_count {
            let remaining = cursor.cursor();
            let cell = Cell::parse(remaining, i, cells_count)?;
            let consumed = cell.encoded_len();
            cells.push(cell);
            cursor.read_bytes(consumed)?;
        }

        Ok(CellTable { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `index` is 1-based, matching the wire encoding's cell-index space;
    /// callers index cells with `table.get(0)` for the root.
    pub fn get(&self, index: usize) -> Option<&Cell<'a>> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell<'a>> {
        self.cells.iter()
    }
}
