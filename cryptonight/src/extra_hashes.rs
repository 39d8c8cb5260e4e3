//! The final 256-bit hash, picked from four functions by the permuted state.

use std::fmt::{self, Display};

use digest::Digest as _;
use groestl::Groestl256;
use jh::Jh256;
use skein::{consts::U32, Skein512};

use crate::keccak::KECCAK1600_BYTE_SIZE;

/// One of the four hash functions that turn the final Keccak state into the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraHash {
    /// BLAKE-256, selector `0`.
    Blake256,
    /// Grøstl-256, selector `1`.
    Groestl256,
    /// JH-256, selector `2`.
    Jh256,
    /// Skein-512-256, selector `3`.
    Skein256,
}

impl ExtraHash {
    /// Selects the hash function from the low two bits of `state[0]`.
    ///
    /// This must be called on the state after the final permutation.
    pub const fn from_state(state: &[u8; KECCAK1600_BYTE_SIZE]) -> Self {
        match state[0] & 0x3 {
            0 => Self::Blake256,
            1 => Self::Groestl256,
            2 => Self::Jh256,
            _ => Self::Skein256,
        }
    }

    /// Hashes the full 200-byte state.
    pub fn digest(self, state: &[u8; KECCAK1600_BYTE_SIZE]) -> [u8; 32] {
        match self {
            Self::Blake256 => blake256(state),
            Self::Groestl256 => Groestl256::digest(state).into(),
            Self::Jh256 => Jh256::digest(state).into(),
            Self::Skein256 => Skein512::<U32>::digest(state).into(),
        }
    }

    /// The name of the hash function.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blake256 => "blake256",
            Self::Groestl256 => "groestl256",
            Self::Jh256 => "jh256",
            Self::Skein256 => "skein256",
        }
    }
}

impl Display for ExtraHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn blake256(input: &[u8]) -> [u8; 32] {
    let mut out = [0; 32];
    // `blake` only rejects output lengths other than 224, 256, 384 and 512 bits.
    let hashed = blake::hash(256, input, &mut out).is_ok();
    debug_assert!(hashed, "BLAKE-256 is a supported output length");
    out
}

/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L1868-L1870>
pub(crate) fn extra_hashes(input: &[u8; KECCAK1600_BYTE_SIZE]) -> [u8; 32] {
    let hash = ExtraHash::from_state(input);
    tracing::trace!("final hash: {hash}");
    hash.digest(input)
}
