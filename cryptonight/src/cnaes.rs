//! The AES pieces CryptoNight is built on.
//!
//! CryptoNight does not use AES as a block cipher. It borrows the AES-256 key
//! schedule, truncated to 10 round keys, and the plain AES encryption round
//! (`SubBytes`, `ShiftRows`, `MixColumns`, `AddRoundKey`). There is no initial
//! whitening and no special final round: every round is a full round.
//!
//! The round itself is [`aes::hazmat::cipher_round`], which uses the CPU's AES
//! instructions when they are detected at runtime and a constant-time bitsliced
//! software implementation otherwise. The key schedule only runs twice per hash
//! so it is done in software with the S-box table below.
//!
//! All 128-bit values are little-endian `u128`s, byte `i` of the AES state is
//! byte `i` of `value.to_le_bytes()`.

use aes::{hazmat::cipher_round, Block};

use crate::util::subarray_copy;

/// The size of one AES block in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// The size of the AES key CryptoNight derives its round keys from.
pub const CN_AES_KEY_SIZE: usize = 32;

/// The amount of round keys (and rounds), instead of 14 as in standard AES-256.
pub const ROUND_KEYS: usize = 10;

const KEY_WORDS: usize = CN_AES_KEY_SIZE / 4;
const EXPANDED_WORDS: usize = ROUND_KEYS * 4;

/// Round constants for the words `8, 16, 24, 32`, the only ones needed for 10 round keys.
const RCON: [u8; 4] = [0x01, 0x02, 0x04, 0x08];

#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Applies the S-box to every byte of a key schedule word.
#[inline]
fn sub_word(word: u32) -> u32 {
    u32::from_le_bytes(word.to_le_bytes().map(|b| SBOX[usize::from(b)]))
}

/// Derives the 10 CryptoNight round keys from a 256-bit key.
///
/// This is the AES-256 key expansion stopped after the first 40 words. Words are
/// little-endian, so `RotWord` (`[b0, b1, b2, b3] -> [b1, b2, b3, b0]`) is a
/// right rotation by 8 bits and the round constant lands in the low byte.
pub fn key_extend(key: &[u8; CN_AES_KEY_SIZE]) -> [u128; ROUND_KEYS] {
    let mut words = [0_u32; EXPANDED_WORDS];

    for (i, word) in words.iter_mut().take(KEY_WORDS).enumerate() {
        *word = u32::from_le_bytes(subarray_copy(key, i * 4));
    }

    for i in KEY_WORDS..EXPANDED_WORDS {
        let mut temp = words[i - 1];
        if i % KEY_WORDS == 0 {
            temp = sub_word(temp.rotate_right(8)) ^ u32::from(RCON[i / KEY_WORDS - 1]);
        } else if i % KEY_WORDS == 4 {
            temp = sub_word(temp);
        }
        words[i] = words[i - KEY_WORDS] ^ temp;
    }

    let mut expanded_key = [0_u128; ROUND_KEYS];
    for (round_key, w) in expanded_key.iter_mut().zip(words.chunks_exact(4)) {
        *round_key = w
            .iter()
            .rev()
            .fold(0, |acc, &word| (acc << 32) | u128::from(word));
    }

    expanded_key
}

/// One full AES encryption round of `block` keyed by `round_key`.
///
/// In the memory-hard loop the round key is a working register, not a scheduled key.
#[inline]
pub fn aesb_single_round(block: &mut u128, round_key: u128) {
    let mut state = Block::from(block.to_le_bytes());
    cipher_round(&mut state, &Block::from(round_key.to_le_bytes()));
    *block = u128::from_le_bytes(state.into());
}

/// Ten full AES encryption rounds, keyed in order by the output of [`key_extend`].
#[inline]
pub fn aesb_pseudo_round(block: u128, expanded_key: &[u128; ROUND_KEYS]) -> u128 {
    let mut state = Block::from(block.to_le_bytes());
    for round_key in expanded_key {
        cipher_round(&mut state, &Block::from(round_key.to_le_bytes()));
    }
    u128::from_le_bytes(state.into())
}
