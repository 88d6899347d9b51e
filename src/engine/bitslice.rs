//! Bit-addressable view over a byte buffer (C1).
//!
//! Mirrors the Ledger app's `SliceData_t`: a mutable window
//! `(data, start_bit, end_bit)` over a byte buffer, read MSB-to-LSB within
//! each byte. Used both for read-only views into a cell's payload and as
//! the scratch buffer the dictionary descent and payload splicer write
//! into.

use super::error::{EngineError, Result};

/// A bit-addressable window over an owned byte buffer.
///
/// The buffer is owned (rather than borrowed) so the same type serves both
/// as a read-only view into a cell payload (constructed via
/// [`BitSlice::from_bytes`]) and as the mutable scratch buffer the label
/// decode and payload splice routines write into.
#[derive(Debug, Clone)]
pub struct BitSlice {
    data: Vec<u8>,
    start: usize,
    end: usize,
}

impl BitSlice {
    /// Builds a slice over `byte_len` bytes of `buf`, with the window
    /// spanning the whole buffer.
    pub fn init(buf: Vec<u8>, byte_len: usize) -> Result<Self> {
        if buf.is_empty() && byte_len > 0 {
            return Err(EngineError::SliceEmpty);
        }
        if byte_len > buf.len() {
            return Err(EngineError::invalid_data("byte_len exceeds buffer length"));
        }
        Ok(Self {
            data: buf,
            start: 0,
            end: byte_len * 8,
        })
    }

    /// A zeroed scratch buffer spanning its full `byte_capacity`. Used both
    /// as a write cursor (`append` advances `start` as bits are written,
    /// `cursor_bits()` then reports how much was written) and as the label
    /// buffer during dictionary descent (`fill` + `truncate` shrink `end`
    /// to the decoded label length).
    pub fn scratch(byte_capacity: usize) -> Self {
        Self {
            data: vec![0u8; byte_capacity],
            start: 0,
            end: byte_capacity * 8,
        }
    }

    /// Current write/read cursor position in bits from the start of the
    /// backing buffer. For a buffer under construction via repeated
    /// `append` calls, this is the number of bits written so far.
    pub fn cursor_bits(&self) -> usize {
        self.start
    }

    /// Builds a slice directly over a cell's payload bytes.
    pub fn from_cell_payload(payload: &[u8]) -> Result<Self> {
        Self::init(payload.to_vec(), payload.len())
    }

    fn byte_capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bits remaining in the window; 0 if the window is
    /// inverted (`start > end`). Preserved for compatibility with the
    /// reference implementation even though it hides an otherwise
    /// detectable caller error.
    pub fn remaining_bits(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Advances the start of the window by `n` bits.
    pub fn move_by(&mut self, n: usize) -> Result<()> {
        if self.start + n > self.end {
            return Err(EngineError::CellUnderflow);
        }
        self.start += n;
        Ok(())
    }

    /// Sets the end of the window to `new_end_bits`. Fails if that would
    /// widen the window.
    pub fn truncate(&mut self, new_end_bits: usize) -> Result<()> {
        if new_end_bits > self.end {
            return Err(EngineError::CellUnderflow);
        }
        self.end = new_end_bits;
        Ok(())
    }

    /// Fills the first `n_bytes` of the backing buffer with `value`,
    /// leaving the window unchanged. Used to seed the dictionary label
    /// scratch buffer with the label's fill value before truncating to
    /// the decoded length.
    pub fn fill(&mut self, value: u8, n_bytes: usize) -> Result<()> {
        if n_bytes > self.byte_capacity() {
            return Err(EngineError::invalid_data("fill exceeds buffer capacity"));
        }
        self.data[..n_bytes].fill(value);
        Ok(())
    }

    /// Reads `bits` (1..=8) bits at `start + offset` as the low bits of a
    /// byte, MSB-first within the byte.
    pub fn get_bits(&self, offset: usize, bits: u8) -> Result<u8> {
        if bits == 0 || bits > 8 {
            return Err(EngineError::range_check("bits must be in 1..=8"));
        }
        if offset + bits as usize > self.remaining_bits() {
            return Err(EngineError::CellUnderflow);
        }

        let index = self.start + offset;
        let q = index / 8;
        let r = index % 8;
        let bits = bits as usize;

        if r == 0 {
            Ok(self.byte_at(q)? >> (8 - bits))
        } else if bits <= 8 - r {
            Ok((self.byte_at(q)? >> (8 - r - bits)) & ((1u16 << bits) - 1) as u8)
        } else {
            let mut acc: u16 = (self.byte_at(q)? as u16) << 8;
            if q + 1 < self.byte_capacity() {
                acc |= self.byte_at(q + 1)? as u16;
            }
            let shifted = (acc >> (8 - r)) >> (8 - bits);
            Ok(shifted as u8)
        }
    }

    fn byte_at(&self, index: usize) -> Result<u8> {
        self.data.get(index).copied().ok_or(EngineError::CellUnderflow)
    }

    pub fn get_next_bit(&mut self) -> Result<bool> {
        let bit = self.get_bits(0, 1)? != 0;
        self.move_by(1)?;
        Ok(bit)
    }

    pub fn get_next_byte(&mut self) -> Result<u8> {
        let value = self.get_bits(0, 8)?;
        self.move_by(8)?;
        Ok(value)
    }

    /// Reads `bits` (<=64) bits starting at `offset`, big-endian across
    /// bytes, without advancing the window.
    pub fn get_int(&self, bits: u8) -> Result<u64> {
        if bits > 64 {
            return Err(EngineError::range_check("bits must be <= 64"));
        }
        if bits as usize > self.remaining_bits() {
            return Err(EngineError::CellUnderflow);
        }
        if bits == 0 {
            return Ok(0);
        }

        let mut value: u64 = 0;
        let whole_bytes = bits / 8;
        for i in 0..whole_bytes {
            let byte = self.get_bits((8 * i) as usize, 8)? as u64;
            value |= byte << (8 * (7 - i));
        }
        let remainder = bits % 8;
        if remainder != 0 {
            let r = self.get_bits((whole_bytes * 8) as usize, remainder)? as u64;
            value |= r << (8 * (7 - whole_bytes) + (8 - remainder as u32));
        }

        Ok(value >> (64 - bits as u32))
    }

    pub fn get_next_int(&mut self, bits: u8) -> Result<u64> {
        let value = self.get_int(bits)?;
        self.move_by(bits as usize)?;
        Ok(value)
    }

    /// Reads `16 - leading_zeros(max_value)` bits (0 bits if `max_value`
    /// is 0), advancing the window. Used to decode the unary/binary
    /// length field of a dictionary label.
    pub fn get_next_size(&mut self, max_value: u16) -> Result<u64> {
        if max_value == 0 {
            return Ok(0);
        }
        let bits = (16 - max_value.leading_zeros()) as u8;
        self.get_next_int(bits)
    }

    /// Writes `n_bits` from `src` (MSB-first within each source byte)
    /// starting at the current window start, handling sub-byte
    /// destination alignment. When `append_completion_tag` is set and the
    /// destination is not byte-aligned, an extra `1` bit is written
    /// immediately after the copied bits and the window additionally
    /// advances past the alignment padding byte; on the byte-aligned fast
    /// path the tag is not written (callers needing a tag there are
    /// expected to have pre-seeded the following byte, matching how the
    /// reference implementation behaves).
    pub fn append(&mut self, src: &[u8], n_bits: usize, append_completion_tag: bool) -> Result<()> {
        let bytes = n_bits / 8;
        if bytes > src.len() {
            return Err(EngineError::invalid_data("src too short for n_bits"));
        }
        if self.start + n_bits > self.byte_capacity() * 8 {
            return Err(EngineError::CellUnderflow);
        }

        let offset = self.start;
        if offset % 8 == 0 || bytes == 0 {
            let start_byte = offset / 8;
            let copy_len = bytes.max(1).min(src.len());
            self.data[start_byte..start_byte + copy_len].copy_from_slice(&src[..copy_len]);
        } else {
            let shift = offset % 8;
            let first_byte = offset / 8;
            let mut prev: u8 = 0;
            for j in 0..bytes {
                let i = first_byte + j;
                if i >= self.byte_capacity() {
                    return Err(EngineError::invalid_data("append destination overflow"));
                }
                let cur = src[j] >> shift;
                if j == 0 {
                    let kept_high = (self.data[i] >> (8 - shift)) << (8 - shift);
                    self.data[i] = kept_high | cur;
                } else {
                    self.data[i] = prev | cur;
                }

                prev = src[j] << (8 - shift);
                if j == bytes - 1 {
                    let mut last_byte = prev;
                    let mut bits_written = n_bits;
                    if append_completion_tag {
                        if shift != 7 {
                            last_byte >>= 7 - shift;
                        }
                        last_byte |= 1;
                        if shift != 7 {
                            last_byte <<= 7 - shift;
                        }
                        bits_written += 8 - shift;
                    }
                    if i + 1 >= self.byte_capacity() {
                        return Err(EngineError::invalid_data("append destination overflow"));
                    }
                    self.data[i + 1] = last_byte;
                    self.start += bits_written - n_bits;
                }
            }
        }

        self.start += n_bits;
        Ok(())
    }

    /// True iff both slices have the same remaining bit count and equal
    /// integer interpretation of their remaining bits.
    pub fn equal(&self, other: &BitSlice) -> Result<bool> {
        let self_rb = self.remaining_bits();
        let other_rb = other.remaining_bits();
        if self_rb != other_rb {
            return Ok(false);
        }
        if self_rb == 0 {
            return Ok(true);
        }
        if self_rb > 64 {
            return Err(EngineError::range_check("equal() only supports <=64 bits"));
        }
        Ok(self.get_int(self_rb as u8)? == other.get_int(other_rb as u8)?)
    }

    /// The full backing buffer, independent of the current window. Used by
    /// callers that need an absolute bit offset into the same buffer a
    /// slice was constructed from (e.g. re-deriving an address's byte span
    /// from a cursor position read earlier).
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes covered by the current window, used once a bounded number of
    /// bits (a multiple of 8, or with the completion tag already present)
    /// has been assembled and must be read out whole for hashing.
    pub fn window_bytes(&self) -> Result<&[u8]> {
        if self.start % 8 != 0 {
            return Err(EngineError::invalid_data("window_bytes requires byte-aligned start"));
        }
        let start_byte = self.start / 8;
        let end_byte = (self.end + 7) / 8;
        self.data
            .get(start_byte..end_byte)
            .ok_or(EngineError::CellUnderflow)
    }
}
