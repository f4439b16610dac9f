//! FRI Low-Degree Verifier
//!
//! Checks that the committed trace extension is close to a low-degree
//! polynomial by walking the folding chain. Each layer halves the domain:
//! per query, f(x) and f(-x) authenticate against the previous commitment,
//! the folded value authenticates against the layer's own column
//! commitment, and the two must agree through the folding equation. The
//! terminal layer ships the surviving polynomial in the clear and is
//! spot-checked by direct evaluation.

use alloy_primitives::U256;

use crate::domain;
use crate::error::FailureReason;
use crate::field::Fp;
use crate::hash::Hash2;
use crate::merkle;
use crate::proof::{Dimensions, DirectProof, FriLayer};

/// Perform FRI folding at a single point.
///
/// Given f(x) and f(-x), compute the next layer's value at x^2:
///   (f(x) + f(-x)) / 2 + beta * (f(x) - f(-x)) / (2x)
///
/// The even and odd parts of the polynomial are combined with the
/// transcript challenge beta. Domain points are never zero, so the
/// division is total here.
pub fn fri_fold(fx: U256, f_neg_x: U256, beta: U256, x: U256) -> U256 {
    let inv_two = Fp::inv_two();
    let even = Fp::mul(Fp::add(fx, f_neg_x), inv_two);
    let odd = Fp::div(Fp::mul(Fp::sub(fx, f_neg_x), inv_two), x);
    Fp::add(even, Fp::mul(beta, odd))
}

/// Evaluate a polynomial given its coefficients at point x, via Horner.
pub fn evaluate_polynomial(coeffs: &[U256], x: U256) -> U256 {
    if coeffs.is_empty() {
        return U256::ZERO;
    }
    let mut result = coeffs[coeffs.len() - 1];
    for i in (0..coeffs.len() - 1).rev() {
        result = Fp::mul(result, x);
        result = Fp::add(result, coeffs[i]);
    }
    result
}

/// Verify the folding chain against the committed roots.
///
/// `betas` were drawn from the transcript while the layer roots were
/// committed; `positions` are the transcript-drawn query positions in the
/// initial extension domain. The layer sequence and the terminal component
/// have already been shape-validated.
pub(crate) fn verify_low_degree<H: Hash2>(
    hash: &H,
    l_root: U256,
    layers: &[&FriLayer],
    terminal: &DirectProof,
    betas: &[U256],
    positions: &[usize],
    dims: &Dimensions,
) -> Result<(), FailureReason> {
    if terminal.coefficients.len() > dims.final_poly_bound {
        return Err(FailureReason::TerminalDegreeExceeded);
    }

    // Domain generators per layer, plus the final domain.
    let mut layer_gens = Vec::with_capacity(layers.len());
    for i in 0..layers.len() {
        layer_gens.push(domain::domain_generator(dims.log_lde - i as u32));
    }
    let final_gen = domain::domain_generator(dims.log_lde - dims.num_layers as u32);

    for (q, &position) in positions.iter().enumerate() {
        let mut prev_root = l_root;
        let mut idx = position;
        let mut last_column = U256::ZERO;

        for (i, layer) in layers.iter().enumerate() {
            let depth = dims.log_lde as usize - i;
            let half = dims.layer_domain(i) / 2;
            idx %= half;

            let opening = &layer.openings[q];

            // f(x) and f(-x) live in the previous layer's tree, the folded
            // value in this layer's column tree.
            if !merkle::verify_branch(
                hash,
                prev_root,
                opening.poly_value,
                idx,
                &opening.poly_branch,
                depth,
            ) || !merkle::verify_branch(
                hash,
                prev_root,
                opening.sym_value,
                idx + half,
                &opening.sym_branch,
                depth,
            ) || !merkle::verify_branch(
                hash,
                layer.root,
                opening.column_value,
                idx,
                &opening.column_branch,
                depth - 1,
            ) {
                return Err(FailureReason::RootMismatch);
            }

            let x = domain::evaluate_at(layer_gens[i], idx as u64);
            let folded = fri_fold(opening.poly_value, opening.sym_value, betas[i], x);
            if folded != opening.column_value {
                return Err(FailureReason::FoldingInconsistency);
            }

            prev_root = layer.root;
            last_column = opening.column_value;
        }

        // The last column must sit on the terminal polynomial.
        let x = domain::evaluate_at(final_gen, idx as u64);
        if evaluate_polynomial(&terminal.coefficients, x) != last_column {
            return Err(FailureReason::FoldingInconsistency);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fri_fold_even_function() {
        // For an even function f(x) = f(-x) the fold is f(x), any beta.
        let fx = U256::from(42u64);
        let f_neg_x = U256::from(42u64);
        let beta = U256::from(7u64);
        let x = U256::from(3u64);

        assert_eq!(fri_fold(fx, f_neg_x, beta, x), U256::from(42u64));
    }

    #[test]
    fn test_fri_fold_linear() {
        // f(x) = a*x + b: even part b, odd part a, fold = b + beta*a.
        let a = U256::from(5u64);
        let b = U256::from(10u64);
        let x = U256::from(3u64);
        let beta = U256::from(2u64);

        let fx = Fp::add(Fp::mul(a, x), b);
        let f_neg_x = Fp::add(Fp::mul(a, Fp::neg(x)), b);

        let folded = fri_fold(fx, f_neg_x, beta, x);
        assert_eq!(folded, Fp::add(b, Fp::mul(beta, a)));
    }

    #[test]
    fn test_evaluate_polynomial() {
        // p(x) = 3 + 2x + x^2
        let coeffs = [U256::from(3u64), U256::from(2u64), U256::from(1u64)];

        assert_eq!(evaluate_polynomial(&coeffs, U256::ZERO), U256::from(3u64));
        assert_eq!(
            evaluate_polynomial(&coeffs, U256::from(1u64)),
            U256::from(6u64)
        );
        assert_eq!(
            evaluate_polynomial(&coeffs, U256::from(10u64)),
            U256::from(123u64)
        );
    }

    #[test]
    fn test_evaluate_polynomial_empty() {
        assert_eq!(evaluate_polynomial(&[], U256::from(5u64)), U256::ZERO);
    }

    #[test]
    fn test_evaluate_polynomial_constant() {
        let coeffs = [U256::from(7u64)];
        assert_eq!(
            evaluate_polynomial(&coeffs, U256::from(999u64)),
            U256::from(7u64)
        );
    }
}
