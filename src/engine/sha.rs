//! SHA-256 as an injected collaborator.
//!
//! The spec treats the hash primitive as external to the engine (the
//! engine "consumes" it, it doesn't own it). `Sha2Backend` is the concrete
//! default so the crate is usable out of the box; callers who need a
//! different primitive (e.g. a hardware-backed one) can supply their own
//! `Sha256` implementation instead.

use sha2::{Digest, Sha256 as Sha256Impl};

use super::error::{EngineError, Result};

pub trait Sha256 {
    /// Hashes `input`, returning 32 bytes on success.
    fn hash(&self, input: &[u8]) -> Result<[u8; 32]>;
}

/// Default `Sha256` backed by the `sha2` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha2Backend;

impl Sha256 for Sha2Backend {
    fn hash(&self, input: &[u8]) -> Result<[u8; 32]> {
        let mut hasher = Sha256Impl::new();
        hasher.update(input);
        let digest = hasher.finalize();
        digest
            .as_slice()
            .try_into()
            .map_err(|_| EngineError::InvalidHash)
    }
}
