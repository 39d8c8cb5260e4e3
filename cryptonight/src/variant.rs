use std::{
    fmt::{self, Display},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::VariantParseError;

/// The CryptoNight variant selector.
///
/// Only variant 1 changes the algorithm. Every other selector, including the
/// reserved ones from 2 upwards, runs the original (variant 0) algorithm. The
/// selector is still kept as-is so callers can tell variants apart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Variant(u8);

impl Variant {
    /// The original algorithm.
    pub const V0: Self = Self(0);
    /// Variant 1, which tweaks a scratchpad byte and XORs an 8 byte tweak into every write-back.
    pub const V1: Self = Self(1);
    /// Variant 2, which is currently hashed exactly like [`Self::V0`].
    pub const V2: Self = Self(2);

    /// Creates a variant from its selector number.
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Returns the selector number.
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns `true` if this variant applies the variant 1 tweaks.
    pub const fn has_tweak(self) -> bool {
        self.0 == Self::V1.0
    }
}

impl From<u8> for Variant {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

impl From<Variant> for u8 {
    fn from(variant: Variant) -> Self {
        variant.0
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cn/{}", self.0)
    }
}

impl FromStr for Variant {
    type Err = VariantParseError;

    /// Accepts `N`, `vN` and `cn/N`, where `N` is plain decimal digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .strip_prefix("cn/")
            .or_else(|| s.strip_prefix('v'))
            .unwrap_or(s);

        // `u8::from_str` also takes a leading `+`
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VariantParseError(s.into()));
        }

        number
            .parse()
            .map(Self)
            .map_err(|_| VariantParseError(s.into()))
    }
}
