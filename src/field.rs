//! Field Arithmetic
//!
//! All arithmetic is over the prime `p = 2^256 - 351 * 2^32 + 1`, the field
//! the MiMC execution traces and their low-degree extensions live in.
//! Values are plain `U256` integers kept in `[0, p)`; every operation
//! reduces its result.

use alloy_primitives::U256;

use crate::error::FieldError;

/// The field prime: 2^256 - 351 * 2^32 + 1.
pub const MODULUS: U256 = U256::from_limbs([
    0xfffffea100000001,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0xffffffffffffffff,
]);

pub struct Fp;

impl Fp {
    #[inline(always)]
    pub fn add(a: U256, b: U256) -> U256 {
        let (sum, overflow) = a.overflowing_add(b);
        if overflow || sum >= MODULUS {
            sum.wrapping_sub(MODULUS)
        } else {
            sum
        }
    }

    #[inline(always)]
    pub fn sub(a: U256, b: U256) -> U256 {
        if a >= b {
            a.wrapping_sub(b)
        } else {
            MODULUS.wrapping_sub(b.wrapping_sub(a))
        }
    }

    #[inline(always)]
    pub fn mul(a: U256, b: U256) -> U256 {
        a.mul_mod(b, MODULUS)
    }

    #[inline]
    pub fn pow(base: U256, exp: U256) -> U256 {
        if exp == U256::ZERO {
            return U256::from(1u64);
        }
        let mut result = U256::from(1u64);
        let mut b = base;
        let mut e = exp;
        while e > U256::ZERO {
            if e & U256::from(1u64) == U256::from(1u64) {
                result = Self::mul(result, b);
            }
            b = Self::mul(b, b);
            e >>= 1;
        }
        result
    }

    /// Modular inverse via Fermat's little theorem. Maps zero to zero;
    /// use [`Fp::inverse`] where zero must be rejected.
    #[inline]
    pub fn inv(a: U256) -> U256 {
        if a == U256::ZERO {
            return U256::ZERO;
        }
        let exp = MODULUS.wrapping_sub(U256::from(2u64));
        Self::pow(a, exp)
    }

    /// Checked modular inverse. Zero has no inverse.
    #[inline]
    pub fn inverse(a: U256) -> Result<U256, FieldError> {
        if a == U256::ZERO {
            return Err(FieldError::DivisionByZero);
        }
        Ok(Self::inv(a))
    }

    #[inline]
    pub fn div(a: U256, b: U256) -> U256 {
        Self::mul(a, Self::inv(b))
    }

    #[inline(always)]
    pub fn neg(a: U256) -> U256 {
        if a == U256::ZERO {
            U256::ZERO
        } else {
            MODULUS.wrapping_sub(a)
        }
    }

    #[inline(always)]
    pub fn reduce(a: U256) -> U256 {
        if a >= MODULUS {
            a.wrapping_sub(MODULUS)
        } else {
            a
        }
    }

    /// (p + 1) / 2, the inverse of two.
    #[inline]
    pub fn inv_two() -> U256 {
        (MODULUS.wrapping_sub(U256::from(1u64)) >> 1usize).wrapping_add(U256::from(1u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps_at_modulus() {
        let p_minus_1 = MODULUS.wrapping_sub(U256::from(1u64));
        assert_eq!(Fp::add(p_minus_1, U256::from(1u64)), U256::ZERO);
        assert_eq!(Fp::add(p_minus_1, U256::from(2u64)), U256::from(1u64));
        assert_eq!(
            Fp::add(U256::from(2u64), U256::from(3u64)),
            U256::from(5u64)
        );
    }

    #[test]
    fn test_sub_wraps_below_zero() {
        assert_eq!(
            Fp::sub(U256::from(3u64), U256::from(5u64)),
            MODULUS.wrapping_sub(U256::from(2u64))
        );
        assert_eq!(Fp::sub(U256::from(5u64), U256::from(3u64)), U256::from(2u64));
    }

    #[test]
    fn test_mul_neg_one_squared() {
        let neg_one = Fp::neg(U256::from(1u64));
        assert_eq!(Fp::mul(neg_one, neg_one), U256::from(1u64));
    }

    #[test]
    fn test_pow_small() {
        assert_eq!(
            Fp::pow(U256::from(2u64), U256::from(10u64)),
            U256::from(1024u64)
        );
        assert_eq!(Fp::pow(U256::from(7u64), U256::ZERO), U256::from(1u64));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let a = U256::from(123456789u64);
        let a_inv = Fp::inverse(a).unwrap();
        assert_eq!(Fp::mul(a, a_inv), U256::from(1u64));
    }

    #[test]
    fn test_inverse_of_zero_fails() {
        assert_eq!(
            Fp::inverse(U256::ZERO),
            Err(crate::error::FieldError::DivisionByZero)
        );
    }

    #[test]
    fn test_inv_two() {
        // inv_two * 2 == 1 (mod p)
        assert_eq!(
            Fp::mul(Fp::inv_two(), U256::from(2u64)),
            U256::from(1u64)
        );
    }

    #[test]
    fn test_reduce() {
        assert_eq!(Fp::reduce(MODULUS), U256::ZERO);
        assert_eq!(Fp::reduce(U256::from(42u64)), U256::from(42u64));
        assert_eq!(Fp::reduce(U256::MAX), U256::MAX.wrapping_sub(MODULUS));
    }
}
