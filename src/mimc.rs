//! MiMC Round Function and Execution Trace
//!
//! Cube-and-add MiMC: one round maps `x` to `x^3 + k`. The round exponent
//! is a protocol constant shared with the proving side; 3 is coprime with
//! `p - 1`, so each round is a permutation of the field.

use alloy_primitives::U256;

use crate::field::Fp;

/// MiMC round exponent.
pub const MIMC_EXPONENT: u64 = 3;

/// One MiMC round: x^MIMC_EXPONENT + k.
#[inline]
pub fn round(x: U256, k: U256) -> U256 {
    Fp::add(Fp::pow(x, U256::from(MIMC_EXPONENT)), k)
}

/// Apply the full permutation: one round per constant, in order.
pub fn apply(x: U256, constants: &[U256]) -> U256 {
    constants.iter().fold(x, |acc, k| round(acc, *k))
}

/// Run `steps` rounds, cycling through the constant schedule.
pub fn iterate(x: U256, steps: usize, constants: &[U256]) -> U256 {
    let mut acc = x;
    for i in 0..steps {
        acc = round(acc, constants[i % constants.len()]);
    }
    acc
}

/// Build the execution trace: `t[0] = input`, `t[i+1] = t[i]^3 + K[i mod n]`.
///
/// The recurrence continues past the claimed endpoint up to `len` rows so
/// the committed table is a power of two; every adjacent pair in the table
/// satisfies the transition.
pub fn trace(input: U256, len: usize, constants: &[U256]) -> Vec<U256> {
    let mut t = Vec::with_capacity(len);
    t.push(input);
    for i in 0..len - 1 {
        t.push(round(t[i], constants[i % constants.len()]));
    }
    t
}
