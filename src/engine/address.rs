//! Display formatting for a derived contract address.
//!
//! The engine's core output is the raw 32-byte hash; this module only
//! covers the optional hex rendering mentioned for the address flow's
//! outputs, kept separate from the hashing path so formatting never
//! participates in what gets hashed.

/// Renders a 32-byte address as a 64-character lowercase hex string.
pub fn format_address_hex(address: &[u8; 32]) -> String {
    hex::encode(address)
}
