use crate::{
    cnaes::{AES_BLOCK_SIZE, CN_AES_KEY_SIZE},
    keccak::KECCAK1600_BYTE_SIZE,
    util::{subarray, subarray_copy, subarray_mut},
};

pub(crate) const INIT_BLOCKS: usize = 8;
pub(crate) const INIT_SIZE_BYTE: usize = INIT_BLOCKS * AES_BLOCK_SIZE;

const INIT_OFFSET: usize = 2 * CN_AES_KEY_SIZE;
const TWEAK_OFFSET: usize = INIT_OFFSET + INIT_SIZE_BYTE;

const _: () = assert!(TWEAK_OFFSET + 8 == KECCAK1600_BYTE_SIZE);

/// The 200-byte Keccak state the whole hash is threaded through.
///
/// The bytes are the only storage, every other view (keys, 128-bit blocks,
/// words) is decoded from them as little-endian when asked for:
///
/// | bytes       | use                                              |
/// |-------------|--------------------------------------------------|
/// | `0..32`     | AES key for filling the scratchpad               |
/// | `32..64`    | AES key for compressing the scratchpad           |
/// | `0..64`     | `k`, the 4 blocks that seed the `a` and `b` registers |
/// | `64..192`   | the 8 "init" blocks, later the compressed scratchpad |
/// | `192..200`  | variant 1 tweak material                         |
///
/// Equivalent struct in the C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L469-L477>
pub(crate) struct HashState {
    b: [u8; KECCAK1600_BYTE_SIZE],
}

impl Default for HashState {
    fn default() -> Self {
        Self {
            b: [0; KECCAK1600_BYTE_SIZE],
        }
    }
}

impl HashState {
    pub(crate) const fn get_keccak_bytes(&self) -> &[u8; KECCAK1600_BYTE_SIZE] {
        &self.b
    }

    pub(crate) const fn get_keccak_bytes_mut(&mut self) -> &mut [u8; KECCAK1600_BYTE_SIZE] {
        &mut self.b
    }

    /// Bytes `0..64` as four blocks, the seed of the mixing registers.
    pub(crate) fn get_k(&self) -> [u128; 4] {
        std::array::from_fn(|i| u128::from_le_bytes(subarray_copy(&self.b, i * AES_BLOCK_SIZE)))
    }

    pub(crate) fn get_aes_key0(&self) -> &[u8; CN_AES_KEY_SIZE] {
        subarray(&self.b, 0)
    }

    pub(crate) fn get_aes_key1(&self) -> &[u8; CN_AES_KEY_SIZE] {
        subarray(&self.b, CN_AES_KEY_SIZE)
    }

    #[inline]
    pub(crate) fn get_init(&self) -> [u128; INIT_BLOCKS] {
        let mut init = [0_u128; INIT_BLOCKS];
        for (i, block) in init.iter_mut().enumerate() {
            *block = u128::from_le_bytes(subarray_copy(&self.b, INIT_OFFSET + i * AES_BLOCK_SIZE));
        }
        init
    }

    pub(crate) fn set_init(&mut self, init: &[u128; INIT_BLOCKS]) {
        for (i, block) in init.iter().enumerate() {
            let dst: &mut [u8; AES_BLOCK_SIZE] =
                subarray_mut(&mut self.b, INIT_OFFSET + i * AES_BLOCK_SIZE);
            *dst = block.to_le_bytes();
        }
    }

    pub(crate) fn get_tweak_seed(&self) -> u64 {
        u64::from_le_bytes(subarray_copy(&self.b, TWEAK_OFFSET))
    }
}
