//! Adapters over the Keccak-1600 crates.

use digest::Digest as _;

use crate::util::subarray_copy;

/// The size of the Keccak-1600 state in bytes.
pub(crate) const KECCAK1600_BYTE_SIZE: usize = 200;

const KECCAK1600_LANES: usize = KECCAK1600_BYTE_SIZE / 8;

/// Absorbs `input` into a fresh Keccak-1600 state (rate 136, Keccak padding)
/// and writes the whole 200-byte state to `out`.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/keccak.c#L180-L184>
pub(crate) fn keccak1600(input: &[u8], out: &mut [u8; KECCAK1600_BYTE_SIZE]) {
    let result = sha3::Keccak256Full::digest(input);
    out.copy_from_slice(result.as_ref());
}

/// Runs Keccak-f\[1600\] over the state in place. The 200 bytes are read as
/// 25 little-endian lanes and written back the same way.
///
/// Monero's C code:
/// <https://github.com/monero-project/monero/blob/v0.18.3.4/src/crypto/hash.c#L38-L47>
pub(crate) fn hash_permutation(b: &mut [u8; KECCAK1600_BYTE_SIZE]) {
    let mut lanes = [0_u64; KECCAK1600_LANES];
    for (lane, bytes) in lanes.iter_mut().zip(b.chunks_exact(8)) {
        *lane = u64::from_le_bytes(subarray_copy(bytes, 0));
    }

    keccak::f1600(&mut lanes);

    for (bytes, lane) in b.chunks_exact_mut(8).zip(lanes) {
        bytes.copy_from_slice(&lane.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::hex_to_array;

    #[test]
    fn test_keccak1600() {
        let input: [u8; 44] = hex_to_array(
            "5468697320697320612074657374205468697320697320612074657374205468697320697320612074657374"
        );
        let mut output = [0_u8; KECCAK1600_BYTE_SIZE];
        keccak1600(&input, &mut output);
        let output_hex = "af6fe96f8cb409bdd2a61fb837e346f1a28007b0f078a8d68bc1224b6fcfcc3c39f1244db8c0af06e94173db4a54038a2f7a6a9c729928b5ec79668a30cbf5f266110665e23e891ea4ee2337fb304b35bf8d9c2e4c3524e52e62db67b0b170487a68a34f8026a81b35dc835c60b356d2c411ad227b6c67e30e9b57ba34b3cf27fccecae972850cf3889bb3ff8347b55a5710d58086973d12d75a3340a39430b65ee2f4be27c21e7b39f47341dd036fe13bf43bb2c55bce498a3adcbf07397ea66062b66d56cd8136";
        assert_eq!(hex::encode(output), output_hex);
    }

    #[test]
    fn test_keccak1600_overwrites_previous_state() {
        let mut first = [0xAA_u8; KECCAK1600_BYTE_SIZE];
        let mut second = [0_u8; KECCAK1600_BYTE_SIZE];
        keccak1600(b"cryptonight", &mut first);
        keccak1600(b"cryptonight", &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_hash_permutations() {
        let mut state_bytes: [u8; KECCAK1600_BYTE_SIZE] = hex_to_array(
            "af6fe96f8cb409bdd2a61fb837e346f1a28007b0f078a8d68bc1224b6fcfcc3c39f1244db8c0af06e94173db4a54038a2f7a6a9c729928b5ec79668a30cbf5f2622fea9d7982e587e6612c4e6a1d28fdbaba4af1aea99e63322a632d514f35b4fc5cf231e9a6328efb5eb22ad2cfabe571ee8b6ef7dbc64f63185d54a771bdccd207b75e10547b4928f5dcb309192d88bf313d8bc53c8fe71da7ea93355d266c5cc8d39a1273e44b074d143849a3b302edad73c2e61f936c502f6bbabb972b616062b66d56cd8136"
        );
        const EXPECTED: &str = "31e2fb6eb8e2e376d42a53bc88166378f2a23cf9be54645ff69e8ade3aa4b7ad35040d0e3ad0ee0d8562d53a51acdf14f44de5c097c48a29f63676346194b3af13c3c45af214335a14329491081068a32ea29b3a6856e0efa737dff49d3b5dbf3f7847f058bb41d36347c19d5cd5bdb354ac64a86156c8194e19b0f62d109a8112024a7734730a2bb221c137d3034204e1e57d9cec9689bc199de684f38aeed4624b84c39675a4755ce9b69fde9d36cabd12f1aef4a5b2bb6c6126900799f2109e9b6b55d7bb3ff5";
        hash_permutation(&mut state_bytes);
        assert_eq!(hex::encode(state_bytes), EXPECTED);
    }
}
