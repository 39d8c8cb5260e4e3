use crate::{
    arena::{Scratchpad, MEMORY, MEMORY_BLOCKS},
    cnaes::{self, AES_BLOCK_SIZE},
    error::DataCanNotBeHashed,
    extra_hashes::extra_hashes,
    keccak::{hash_permutation, keccak1600},
    state::{HashState, INIT_BLOCKS},
    util::subarray_copy,
    variant::Variant,
};

/// The number of mixing iterations, each doing one AES round and one multiply.
const ITER: usize = 1 << 19;

/// Masks the low 32 bits of a register down to a 16-byte aligned scratchpad offset.
const ADDRESS_MASK: u32 = 0x1F_FFF0;

const _: () = {
    assert!(ADDRESS_MASK as usize + AES_BLOCK_SIZE == MEMORY);
    assert!(ADDRESS_MASK as usize % AES_BLOCK_SIZE == 0);
};

/// Where the 8 tweak bytes start in the hashed data (the nonce in a block hashing blob).
const NONCE_PTR_INDEX: usize = 35;

/// The minimum data length for [`Variant::V1`].
pub(crate) const MIN_V1_DATA_LEN: usize = NONCE_PTR_INDEX + 8;

/// Turns the low 21 bits of `a` into a 16-byte aligned byte offset into the scratchpad.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L1709C1-L1709C27>
#[inline]
#[expect(clippy::cast_possible_truncation)]
const fn to_addr(a: u128) -> usize {
    // only the low 21 bits survive the mask, so nothing is lost on 32-bit targets
    ((a as u32) & ADDRESS_MASK) as usize
}

/// The scratchpad block index for register `a`.
#[inline]
const fn e2i(a: u128) -> usize {
    to_addr(a) / AES_BLOCK_SIZE
}

/// The full 128-bit product of `a` and `b` as a block: bytes `0..8` hold the
/// high word, bytes `8..16` the low word.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L1711-L1720>
fn mul(a: u64, b: u64) -> u128 {
    // a u64 * u64 product can't overflow a u128
    (u128::from(a) * u128::from(b)).rotate_left(64)
}

/// Lane-wise `a + b`: each 64-bit half wraps on its own, no carry crosses from
/// bytes `0..8` into bytes `8..16`.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L1722-L1733>
#[expect(clippy::cast_possible_truncation)]
fn sum_half_blocks(a: u128, b: u128) -> u128 {
    let lo = (a as u64).wrapping_add(b as u64);
    let hi = ((a >> 64) as u64).wrapping_add((b >> 64) as u64);
    u128::from(lo) | (u128::from(hi) << 64)
}

/// Builds the variant 1 tweak from the end of the Keccak state and bytes `35..43` of `data`.
///
/// `data` must be at least [`MIN_V1_DATA_LEN`] bytes.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L144-L151>
fn variant1_init(state: &HashState, data: &[u8]) -> u64 {
    debug_assert!(data.len() >= MIN_V1_DATA_LEN);
    state.get_tweak_seed() ^ u64::from_le_bytes(subarray_copy(data, NONCE_PTR_INDEX))
}

/// Scrambles bits 4 and 5 of byte 11 of a freshly written block.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L120-L127>
#[expect(clippy::cast_possible_truncation)]
fn variant1_1(p: &mut u128) {
    const MASK_BYTE11: u128 = !(0xFF << (11 * 8)); // all bits except the 11th byte are ones

    let t = (*p >> (11 * 8)) as u8;
    let not_bit0 = !t & 1;
    let tweak = (not_bit0 << 4) | (((not_bit0 << 4) & t) << 1) | ((t & 32) >> 1);
    *p = (*p & MASK_BYTE11) | (u128::from(t ^ tweak) << (11 * 8));
}

/// XORs the tweak into the high lane (bytes `8..16`) of a freshly written block.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L129C1-L133C13>
fn variant1_2(c2: &mut u128, tweak1_2: u64) {
    *c2 ^= u128::from(tweak1_2) << 64;
}

/// Fills the scratchpad 128 bytes at a time, encrypting the init blocks of the
/// state with the first AES key and carrying them from chunk to chunk.
fn explode_scratchpad(state: &HashState, long_state: &mut [u128; MEMORY_BLOCKS]) {
    let aes_expanded_key = cnaes::key_extend(state.get_aes_key0());
    let mut text = state.get_init();

    for chunk in long_state.chunks_exact_mut(INIT_BLOCKS) {
        for (block, dst) in text.iter_mut().zip(chunk) {
            *block = cnaes::aesb_pseudo_round(*block, &aes_expanded_key);
            *dst = *block;
        }
    }
}

/// The memory-hard main loop.
///
/// Every iteration reads and writes two blocks whose addresses come from the
/// previous iteration, so iterations can't be run out of order.
#[expect(clippy::cast_possible_truncation)]
fn mix(state: &HashState, long_state: &mut [u128; MEMORY_BLOCKS], tweak1_2: Option<u64>) {
    let k = state.get_k();
    let mut a = k[0] ^ k[2];
    let mut b = k[1] ^ k[3];

    for _ in 0..ITER {
        /* Dependency chain: address -> read value ------+
         * written value <-+ hard function (AES or MUL) <+
         * next address  <-+
         */
        let j = e2i(a);
        let mut c = long_state[j];
        cnaes::aesb_single_round(&mut c, a);
        long_state[j] = c ^ b;
        if tweak1_2.is_some() {
            variant1_1(&mut long_state[j]);
        }
        b = c;

        let j = e2i(c);
        let d = long_state[j];
        a = sum_half_blocks(a, mul(c as u64, d as u64));
        long_state[j] = a;
        a ^= d;
        if let Some(tweak1_2) = tweak1_2 {
            variant1_2(&mut long_state[j], tweak1_2);
        }
    }
}

/// Folds the scratchpad back into the init blocks of the state with the second
/// AES key, rewriting each chunk with its encrypted value.
fn implode_scratchpad(state: &mut HashState, long_state: &mut [u128; MEMORY_BLOCKS]) {
    let aes_expanded_key = cnaes::key_extend(state.get_aes_key1());
    let mut text = state.get_init();

    for chunk in long_state.chunks_exact_mut(INIT_BLOCKS) {
        for (block, src) in text.iter_mut().zip(chunk) {
            *block ^= *src;
            *block = cnaes::aesb_pseudo_round(*block, &aes_expanded_key);
            *src = *block;
        }
    }

    state.set_init(&text);
}

/// Runs the whole hash using `state` and `scratchpad` as working memory.
///
/// Both are fully overwritten before they are read, so whatever a previous
/// call left in them has no effect on the result.
///
/// # Errors
/// Returns [`DataCanNotBeHashed`] if `variant` is [`Variant::V1`] and `data` is
/// shorter than 43 bytes. Nothing is written in that case.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/slow-hash.c#L1776-L1873>
pub(crate) fn cn_slow_hash(
    state: &mut HashState,
    scratchpad: &mut Scratchpad,
    data: &[u8],
    variant: Variant,
) -> Result<[u8; 32], DataCanNotBeHashed> {
    if variant.has_tweak() && data.len() < MIN_V1_DATA_LEN {
        return Err(DataCanNotBeHashed { len: data.len() });
    }

    tracing::trace!(len = data.len(), %variant, "absorbing data");
    keccak1600(data, state.get_keccak_bytes_mut());
    let tweak1_2 = variant.has_tweak().then(|| variant1_init(state, data));

    let long_state = scratchpad.blocks_mut();

    tracing::trace!("exploding scratchpad");
    explode_scratchpad(state, long_state);

    tracing::trace!("mixing scratchpad");
    mix(state, long_state, tweak1_2);

    tracing::trace!("imploding scratchpad");
    implode_scratchpad(state, long_state);

    hash_permutation(state.get_keccak_bytes_mut());

    Ok(extra_hashes(state.get_keccak_bytes()))
}
