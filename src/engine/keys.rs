//! Public key retrieval as an injected collaborator.
//!
//! Key derivation and the ed25519 signer are explicitly out of scope for
//! this engine (see spec.md §1); it only ever needs 32 raw public key
//! bytes for a given account index, the same shape as the Ledger app's
//! `get_public_key(account_number, out32)` APDU round-trip.

pub trait PublicKeyProvider {
    /// Returns the 32-byte public key for `account_index`. Infallible from
    /// the engine's perspective, matching the original collaborator
    /// contract.
    fn public_key(&self, account_index: u32) -> [u8; 32];
}

/// A `PublicKeyProvider` that always returns the same key, regardless of
/// account index. Useful for tests and for callers who already resolved
/// the key out of band (e.g. from a prior device round-trip).
#[derive(Debug, Clone, Copy)]
pub struct StaticKeyProvider(pub [u8; 32]);

impl PublicKeyProvider for StaticKeyProvider {
    fn public_key(&self, _account_index: u32) -> [u8; 32] {
        self.0
    }
}

impl<F> PublicKeyProvider for F
where
    F: Fn(u32) -> [u8; 32],
{
    fn public_key(&self, account_index: u32) -> [u8; 32] {
        self(account_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_ignores_account_index() {
        let provider = StaticKeyProvider([7u8; 32]);
        assert_eq!(provider.public_key(0), [7u8; 32]);
        assert_eq!(provider.public_key(42), [7u8; 32]);
    }

    #[test]
    fn closure_provider() {
        let provider = |idx: u32| [idx as u8; 32];
        assert_eq!(provider.public_key(5), [5u8; 32]);
    }
}
