//! Fiat-Shamir Channel
//!
//! Deterministic transcript for non-interactive verification. Prover and
//! verifier commit the same values in the same order, so folding
//! challenges and sampled positions are derived on both sides and never
//! travel inside the proof.

use alloy_primitives::U256;

use crate::hash::Hash2;

/// Fiat-Shamir channel for deterministic challenge generation.
pub struct Channel<'a, H: Hash2> {
    hash: &'a H,
    state: U256,
    counter: u64,
}

impl<'a, H: Hash2> Channel<'a, H> {
    pub fn new(hash: &'a H, seed: U256) -> Self {
        Channel {
            hash,
            state: seed,
            counter: 0,
        }
    }

    /// Commit a value to the transcript.
    pub fn commit(&mut self, value: U256) {
        self.state = self.hash.hash_two(self.state, value);
        self.counter = 0;
    }

    /// Draw a field element from the current state.
    pub fn draw_felt(&mut self) -> U256 {
        let challenge = self.hash.hash_two(self.state, U256::from(self.counter));
        self.counter += 1;
        challenge
    }

    /// Draw `count` distinct positions in a power-of-two domain.
    pub fn draw_positions(&mut self, count: usize, domain_size: usize) -> Vec<usize> {
        debug_assert!(domain_size.is_power_of_two());
        let mask = U256::from((domain_size - 1) as u64);
        let mut positions = Vec::with_capacity(count);

        while positions.len() < count {
            let raw = self.draw_felt();
            let index = (raw & mask).as_limbs()[0] as usize;
            if !positions.contains(&index) {
                positions.push(index);
            }
        }

        positions
    }

    pub fn state(&self) -> U256 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Keccak256Compression;

    #[test]
    fn test_channel_deterministic() {
        let hash = Keccak256Compression;
        let seed = U256::from(42u64);

        let mut ch1 = Channel::new(&hash, seed);
        ch1.commit(U256::from(100u64));
        let v1 = ch1.draw_felt();

        let mut ch2 = Channel::new(&hash, seed);
        ch2.commit(U256::from(100u64));
        let v2 = ch2.draw_felt();

        assert_eq!(v1, v2);
    }

    #[test]
    fn test_draw_felt_advances() {
        let hash = Keccak256Compression;
        let mut ch = Channel::new(&hash, U256::from(1u64));
        assert_ne!(ch.draw_felt(), ch.draw_felt());
    }

    #[test]
    fn test_draw_positions_distinct_and_in_range() {
        let hash = Keccak256Compression;
        let mut ch = Channel::new(&hash, U256::from(7u64));
        let positions = ch.draw_positions(8, 16);
        assert_eq!(positions.len(), 8);
        for (i, p) in positions.iter().enumerate() {
            assert!(*p < 16);
            assert!(!positions[..i].contains(p));
        }
    }
}
