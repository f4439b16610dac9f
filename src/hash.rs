//! Two-to-One Compression Functions
//!
//! Merkle commitments and the Fiat-Shamir channel both consume a two-to-one
//! compression over field elements. The concrete function is a pluggable
//! capability: fixtures from the reference prover use Keccak256, and a
//! MiMC-based compression is available for deployments whose committing
//! side hashes with the permutation itself.

use alloy_primitives::U256;
use tiny_keccak::{Hasher, Keccak};

use crate::field::Fp;
use crate::mimc;

/// Two-to-one compression over field elements.
pub trait Hash2 {
    /// Compress two field elements into one. The output is reduced into
    /// the field.
    fn hash_two(&self, a: U256, b: U256) -> U256;
}

/// Keccak256 hash of a byte slice.
fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Keccak256 compression.
///
/// Encoding contract: each element is serialized as 32-byte big-endian,
/// the two chunks are concatenated into a 64-byte buffer, keccak256 is
/// applied, and the digest is interpreted as a big-endian integer reduced
/// mod p. A single conditional subtract suffices since p > 2^255.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Compression;

impl Hash2 for Keccak256Compression {
    fn hash_two(&self, a: U256, b: U256) -> U256 {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&a.to_be_bytes::<32>());
        buf[32..].copy_from_slice(&b.to_be_bytes::<32>());
        let raw = U256::from_be_bytes(keccak256(&buf));
        Fp::reduce(raw)
    }
}

/// MiMC-based compression: absorb the first input through the permutation,
/// add the second, absorb again.
#[derive(Debug, Clone)]
pub struct MimcCompression {
    constants: Vec<U256>,
}

impl MimcCompression {
    pub fn new(constants: Vec<U256>) -> Self {
        MimcCompression { constants }
    }
}

impl Default for MimcCompression {
    fn default() -> Self {
        // Same constant schedule the demo traces use.
        MimcCompression::new((0..64u64).map(|i| U256::from(i.pow(7) ^ 42)).collect())
    }
}

impl Hash2 for MimcCompression {
    fn hash_two(&self, a: U256, b: U256) -> U256 {
        let s = mimc::apply(a, &self.constants);
        mimc::apply(Fp::add(s, b), &self.constants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::MODULUS;

    #[test]
    fn test_keccak_deterministic() {
        let h = Keccak256Compression;
        let a = U256::from(1u64);
        let b = U256::from(2u64);
        assert_eq!(h.hash_two(a, b), h.hash_two(a, b));
    }

    #[test]
    fn test_keccak_order_sensitive() {
        let h = Keccak256Compression;
        let a = U256::from(1u64);
        let b = U256::from(2u64);
        assert_ne!(h.hash_two(a, b), h.hash_two(b, a));
    }

    #[test]
    fn test_keccak_output_in_field() {
        let h = Keccak256Compression;
        let mut a = U256::ZERO;
        for i in 0..100u64 {
            let v = h.hash_two(a, U256::from(i));
            assert!(v < MODULUS, "output at i={} out of field", i);
            a = v;
        }
    }

    #[test]
    fn test_keccak_matches_reference_encoding() {
        let h = Keccak256Compression;
        let mut buf = [0u8; 64];
        buf[31] = 1;
        buf[63] = 2;
        let expected = Fp::reduce(U256::from_be_bytes(keccak256(&buf)));
        assert_eq!(h.hash_two(U256::from(1u64), U256::from(2u64)), expected);
    }

    #[test]
    fn test_mimc_compression_deterministic_and_order_sensitive() {
        let h = MimcCompression::default();
        let a = U256::from(100u64);
        let b = U256::from(200u64);
        assert_eq!(h.hash_two(a, b), h.hash_two(a, b));
        assert_ne!(h.hash_two(a, b), h.hash_two(b, a));
        assert!(h.hash_two(a, b) < MODULUS);
    }
}
