//! Reference Prover
//!
//! Generates proofs for tests, demos, and fixtures. Mirrors the verifier's
//! transcript exactly: commit the trace and low-degree roots, draw the
//! sampled rows, fold layer by layer while committing each column root,
//! ship the terminal coefficients, then assemble openings for the
//! transcript-drawn positions.

use alloy_primitives::U256;

use crate::channel::Channel;
use crate::domain;
use crate::error::ProofError;
use crate::field::Fp;
use crate::fri;
use crate::hash::Hash2;
use crate::merkle::MerkleTree;
use crate::mimc;
use crate::proof::{
    Dimensions, DirectProof, FriComponent, FriLayer, FriQueryOpening, Proof, PublicInputs,
    TraceOpening,
};
use crate::stark::{draw_trace_rows, transcript_seed, VerifierParams};

/// Generate a proof that `steps` MiMC rounds map `input` to the returned
/// public output.
pub fn prove<H: Hash2>(
    input: U256,
    steps: usize,
    round_constants: &[U256],
    params: &VerifierParams<H>,
) -> Result<(PublicInputs, Proof), ProofError> {
    let dims = Dimensions::new(steps, params.blowup, params.num_queries)?;

    // Range-check the statement before running the permutation.
    let probe = PublicInputs {
        input,
        output: U256::ZERO,
        steps,
        round_constants: round_constants.to_vec(),
    };
    probe.validate()?;

    let trace = mimc::trace(input, dims.trace_domain, round_constants);
    let public = PublicInputs {
        output: trace[steps],
        ..probe
    };

    // Low-degree extension of the trace polynomial.
    let mut extension = trace.clone();
    domain::ifft(&mut extension, dims.log_trace);
    extension.resize(dims.lde_domain, U256::ZERO);
    domain::fft(&mut extension, dims.log_lde);

    let proof = prove_with_extension(&public, &trace, extension, &dims, &params.hash);
    Ok((public, proof))
}

/// Assemble a proof from a trace and a committed extension.
///
/// The extension must agree with the trace on the embedded subgroup or the
/// linkage checks will reject the result.
pub(crate) fn prove_with_extension<H: Hash2>(
    public: &PublicInputs,
    trace: &[U256],
    extension: Vec<U256>,
    dims: &Dimensions,
    hash: &H,
) -> Proof {
    let trace_tree = MerkleTree::build(trace, hash);
    let l_tree = MerkleTree::build(&extension, hash);

    let seed = transcript_seed(hash, public);
    let mut channel = Channel::new(hash, seed);
    channel.commit(trace_tree.root());
    channel.commit(l_tree.root());

    let rows = draw_trace_rows(
        &mut channel,
        dims.num_queries,
        dims.trace_domain,
        public.steps,
    );

    // Fold layer by layer; each column commitment enters the transcript
    // right after the beta that produced it.
    let mut layer_evals: Vec<Vec<U256>> = vec![extension];
    let mut layer_trees: Vec<MerkleTree> = vec![l_tree];
    for i in 0..dims.num_layers {
        let beta = channel.draw_felt();
        let current = &layer_evals[i];
        let half = current.len() / 2;
        let gen = domain::domain_generator(dims.log_lde - i as u32);

        let mut folded = Vec::with_capacity(half);
        let mut x = U256::from(1u64);
        for j in 0..half {
            folded.push(fri::fri_fold(current[j], current[j + half], beta, x));
            x = Fp::mul(x, gen);
        }

        let tree = MerkleTree::build(&folded, hash);
        channel.commit(tree.root());
        layer_evals.push(folded);
        layer_trees.push(tree);
    }

    // Terminal coefficients of the fully folded polynomial.
    let mut coefficients = layer_evals[dims.num_layers].clone();
    domain::ifft(&mut coefficients, dims.log_lde - dims.num_layers as u32);
    while coefficients.len() > 1 && coefficients.last() == Some(&U256::ZERO) {
        coefficients.pop();
    }
    for c in &coefficients {
        channel.commit(*c);
    }

    let positions = channel.draw_positions(dims.num_queries, dims.lde_domain);

    // Openings for the sampled trace rows.
    let branches = rows
        .iter()
        .map(|&row| TraceOpening {
            value: trace[row],
            next_value: trace[row + 1],
            branch: trace_tree.auth_path(row),
            next_branch: trace_tree.auth_path(row + 1),
            low_degree_branch: layer_trees[0].auth_path(row * dims.blowup),
        })
        .collect();

    // Per-layer query openings.
    let mut fri_components = Vec::with_capacity(dims.num_layers + 1);
    for i in 0..dims.num_layers {
        let half = dims.layer_domain(i) / 2;
        let openings = positions
            .iter()
            .map(|&position| {
                let idx = position % half;
                FriQueryOpening {
                    poly_value: layer_evals[i][idx],
                    poly_branch: layer_trees[i].auth_path(idx),
                    sym_value: layer_evals[i][idx + half],
                    sym_branch: layer_trees[i].auth_path(idx + half),
                    column_value: layer_evals[i + 1][idx],
                    column_branch: layer_trees[i + 1].auth_path(idx),
                }
            })
            .collect();
        fri_components.push(FriComponent::Layer(FriLayer {
            root: layer_trees[i + 1].root(),
            openings,
        }));
    }
    fri_components.push(FriComponent::Terminal(DirectProof { coefficients }));

    Proof {
        root: trace_tree.root(),
        l_root: layer_trees[0].root(),
        branches,
        fri_components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Keccak256Compression;

    fn params(num_queries: usize) -> VerifierParams<Keccak256Compression> {
        VerifierParams {
            num_queries,
            ..VerifierParams::default()
        }
    }

    #[test]
    fn test_proof_shape() {
        let constants: Vec<U256> = (1..=4u64).map(U256::from).collect();
        let (public, proof) = prove(U256::from(3u64), 6, &constants, &params(4)).unwrap();

        let dims = Dimensions::new(6, 4, 4).unwrap();
        assert_eq!(proof.branches.len(), 4);
        assert_eq!(proof.fri_components.len(), dims.num_layers + 1);
        assert!(matches!(
            proof.fri_components.last(),
            Some(FriComponent::Terminal(_))
        ));
        assert!(proof.validate(&dims).is_ok());
        assert_eq!(public.output, mimc::iterate(public.input, 6, &constants));
    }

    #[test]
    fn test_prove_rejects_bad_statement() {
        assert!(prove(U256::from(3u64), 6, &[], &params(4)).is_err());
        assert!(prove(crate::field::MODULUS, 6, &[U256::from(1u64)], &params(4)).is_err());
    }

    #[test]
    fn test_terminal_is_low_degree() {
        let constants: Vec<U256> = (1..=4u64).map(U256::from).collect();
        let (_, proof) = prove(U256::from(3u64), 14, &constants, &params(4)).unwrap();

        let dims = Dimensions::new(14, 4, 4).unwrap();
        if let Some(FriComponent::Terminal(direct)) = proof.fri_components.last() {
            assert!(direct.coefficients.len() <= dims.final_poly_bound);
        } else {
            panic!("missing terminal component");
        }
    }
}
