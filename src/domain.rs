//! Evaluation Domains
//!
//! Power-of-two multiplicative subgroups of the field. `p - 1` is divisible
//! by 2^32 and 7 generates the full multiplicative group, so the generator
//! of the order-2^k subgroup is `7^((p-1) / 2^k)`.

use alloy_primitives::U256;

use crate::field::{Fp, MODULUS};

/// Multiplicative generator of the field.
pub const GENERATOR: u64 = 7;

/// Largest k such that 2^k divides p - 1.
pub const TWO_ADICITY: u32 = 32;

/// Get the generator of a 2^log_size sized domain.
pub fn domain_generator(log_size: u32) -> U256 {
    assert!(log_size <= TWO_ADICITY, "log_size exceeds two-adicity");
    let exp = MODULUS.wrapping_sub(U256::from(1u64)) >> (log_size as usize);
    Fp::pow(U256::from(GENERATOR), exp)
}

/// Evaluate g^index.
pub fn evaluate_at(gen: U256, index: u64) -> U256 {
    Fp::pow(gen, U256::from(index))
}

/// Bit-reversal permutation (in-place).
fn bit_reverse_permutation(a: &mut [U256], log_n: u32) {
    let n = a.len();
    for i in 0..n {
        let j = (i as u32).reverse_bits() >> (32 - log_n);
        if i < j as usize {
            a.swap(i, j as usize);
        }
    }
}

/// Radix-2 Cooley-Tukey FFT (iterative, in-place).
///
/// Transforms polynomial coefficients to evaluations on the domain
/// {1, w, w^2, ..., w^{n-1}} where w = domain_generator(log_size).
pub fn fft(coeffs: &mut [U256], log_size: u32) {
    let n = coeffs.len();
    assert_eq!(n, 1 << log_size);
    if n == 1 {
        return;
    }

    bit_reverse_permutation(coeffs, log_size);

    for s in 0..log_size {
        let m = 1usize << (s + 1);
        let half_m = m / 2;
        let w_m = domain_generator(s + 1);

        let mut k = 0;
        while k < n {
            let mut w = U256::from(1u64);
            for j in 0..half_m {
                let u = coeffs[k + j];
                let t = Fp::mul(w, coeffs[k + j + half_m]);
                coeffs[k + j] = Fp::add(u, t);
                coeffs[k + j + half_m] = Fp::sub(u, t);
                w = Fp::mul(w, w_m);
            }
            k += m;
        }
    }
}

/// Inverse FFT: evaluations on the domain back to polynomial coefficients
/// (in-place).
pub fn ifft(evals: &mut [U256], log_size: u32) {
    let n = evals.len();
    assert_eq!(n, 1 << log_size);
    if n == 1 {
        return;
    }

    bit_reverse_permutation(evals, log_size);

    for s in 0..log_size {
        let m = 1usize << (s + 1);
        let half_m = m / 2;
        let w_m = Fp::inv(domain_generator(s + 1));

        let mut k = 0;
        while k < n {
            let mut w = U256::from(1u64);
            for j in 0..half_m {
                let u = evals[k + j];
                let t = Fp::mul(w, evals[k + j + half_m]);
                evals[k + j] = Fp::add(u, t);
                evals[k + j + half_m] = Fp::sub(u, t);
                w = Fp::mul(w, w_m);
            }
            k += m;
        }
    }

    let n_inv = Fp::inv(U256::from(n as u64));
    for val in evals.iter_mut() {
        *val = Fp::mul(*val, n_inv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_generator_order() {
        let g = domain_generator(3);
        assert_eq!(Fp::pow(g, U256::from(8u64)), U256::from(1u64));
        assert_ne!(Fp::pow(g, U256::from(4u64)), U256::from(1u64));
    }

    #[test]
    fn test_nested_generators() {
        // Squaring the generator of the 2n-domain gives the n-domain generator.
        let g8 = domain_generator(3);
        let g4 = domain_generator(2);
        assert_eq!(Fp::mul(g8, g8), g4);
    }

    #[test]
    fn test_fft_ifft_roundtrip() {
        let original = vec![
            U256::from(42u64),
            U256::from(7u64),
            U256::from(1337u64),
            U256::from(0u64),
        ];
        let mut data = original.clone();
        fft(&mut data, 2);
        assert_ne!(data, original);
        ifft(&mut data, 2);
        assert_eq!(data, original);
    }

    #[test]
    fn test_fft_ifft_roundtrip_large() {
        let n = 16;
        let original: Vec<U256> = (0..n).map(|i| U256::from(i as u64 * 31 + 5)).collect();
        let mut data = original.clone();
        fft(&mut data, 4);
        ifft(&mut data, 4);
        assert_eq!(data, original);
    }

    #[test]
    fn test_fft_evaluates_in_natural_order() {
        // f(x) = 3 + 2x: evaluations at {1, w, w^2, w^3} in order.
        let mut data = vec![
            U256::from(3u64),
            U256::from(2u64),
            U256::ZERO,
            U256::ZERO,
        ];
        fft(&mut data, 2);
        let g = domain_generator(2);
        for (i, v) in data.iter().enumerate() {
            let x = evaluate_at(g, i as u64);
            let expected = Fp::add(U256::from(3u64), Fp::mul(U256::from(2u64), x));
            assert_eq!(*v, expected, "mismatch at index {}", i);
        }
    }
}
