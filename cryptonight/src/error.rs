/// Returned when the data is too short for the requested variant.
///
/// Variant 1 mixes the 8 bytes at `35..43` of the input into its tweak, so it
/// needs at least 43 bytes of data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("data can't be hashed, CryptoNight variant 1 needs at least 43 bytes but got {len}")]
pub struct DataCanNotBeHashed {
    /// The length of the rejected data.
    pub len: usize,
}

/// Returned when parsing a [`Variant`](crate::Variant) from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CryptoNight variant: {0:?}")]
pub struct VariantParseError(pub(crate) Box<str>);
