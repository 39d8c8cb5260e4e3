#![doc = include_str!("../README.md")]

cfg_if::cfg_if! {
    // Used in test modules.
    if #[cfg(test)] {
        use serde_json as _;
    }
}

mod arena;
pub mod cnaes;
mod error;
mod extra_hashes;
mod keccak;
mod slow_hash;
mod state;
mod util;
mod variant;

pub use arena::{Arena, ArenaPool, PooledArena, ThreadArenas};
pub use error::{DataCanNotBeHashed, VariantParseError};
pub use extra_hashes::ExtraHash;
pub use variant::Variant;

/// Calculates the CryptoNight hash of `buf` with the given [`Variant`].
///
/// This allocates a new [`Arena`] for the call, use [`Arena::hash`] to hash
/// many inputs with the same memory.
///
/// # Errors
/// Returns [`DataCanNotBeHashed`] if `variant` is [`Variant::V1`] and `buf` is
/// shorter than 43 bytes.
pub fn cryptonight_hash(buf: &[u8], variant: Variant) -> Result<[u8; 32], DataCanNotBeHashed> {
    Arena::new().hash(buf, variant)
}

/// Calculates the CryptoNight v0 hash of `buf`.
pub fn cryptonight_hash_v0(buf: &[u8]) -> [u8; 32] {
    match cryptonight_hash(buf, Variant::V0) {
        Ok(hash) => hash,
        Err(_) => unreachable!("only variant 1 rejects data"),
    }
}

/// Calculates the CryptoNight v1 hash of `buf`.
///
/// # Errors
/// Returns [`DataCanNotBeHashed`] if `buf` is shorter than 43 bytes.
pub fn cryptonight_hash_v1(buf: &[u8]) -> Result<[u8; 32], DataCanNotBeHashed> {
    cryptonight_hash(buf, Variant::V1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v0_ignores_length() {
        let hash = cryptonight_hash_v0(&[]);
        assert_eq!(cryptonight_hash(&[], Variant::V0), Ok(hash));
        assert_eq!(
            cryptonight_hash_v1(&[]),
            Err(DataCanNotBeHashed { len: 0 })
        );
    }
}
