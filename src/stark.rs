//! Top-Level STARK Verification
//!
//! Orchestrates the checks for a MiMC execution-trace proof:
//!
//! 1. Seed the Fiat-Shamir transcript from the public statement and commit
//!    the trace and low-degree roots.
//! 2. Check the claimed endpoint, either by full recomputation or through
//!    the sampled rows alone.
//! 3. Authenticate every sampled row against both commitments and check
//!    one MiMC transition per row.
//! 4. Delegate the low-degree claim to the FRI folding chain.
//!
//! Verification is a pure function over immutable inputs. Structural
//! problems raise `ProofError`; a well-formed proof that fails any check
//! yields `accepted = false` with a diagnostic reason.

use alloy_primitives::U256;

use crate::channel::Channel;
use crate::error::{FailureReason, ProofError, VerificationResult};
use crate::fri;
use crate::hash::{Hash2, Keccak256Compression};
use crate::merkle;
use crate::mimc;
use crate::proof::{Dimensions, DirectProof, FriLayer, Proof, PublicInputs};

/// How the claimed trace endpoint is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceCheck {
    /// Recompute the full trace from `input` and compare to `output`.
    DirectRecomputation,
    /// Trust only the sampled rows. Rows 0 and `steps` are always in the
    /// sample set and must open to `input` and `output`.
    SampledConsistency,
}

/// Protocol parameters, shared by the verifier and the reference prover.
pub struct VerifierParams<H: Hash2> {
    /// Two-to-one compression for commitments and the transcript.
    pub hash: H,
    /// Extension blowup factor.
    pub blowup: usize,
    /// Sampled trace rows and FRI queries per proof.
    pub num_queries: usize,
    /// Endpoint check strategy.
    pub trace_check: TraceCheck,
}

impl Default for VerifierParams<Keccak256Compression> {
    fn default() -> Self {
        VerifierParams {
            hash: Keccak256Compression,
            blowup: 4,
            num_queries: 20,
            trace_check: TraceCheck::DirectRecomputation,
        }
    }
}

/// Seed the transcript from the public statement.
pub(crate) fn transcript_seed<H: Hash2>(hash: &H, public: &PublicInputs) -> U256 {
    let mut seed = public.input;
    seed = hash.hash_two(seed, public.output);
    seed = hash.hash_two(seed, U256::from(public.steps as u64));
    for k in &public.round_constants {
        seed = hash.hash_two(seed, *k);
    }
    seed
}

/// Draw the sampled trace rows. Rows 0 and `steps` are always included;
/// the last table row is never drawn because it has no successor.
pub(crate) fn draw_trace_rows<H: Hash2>(
    channel: &mut Channel<H>,
    count: usize,
    trace_domain: usize,
    steps: usize,
) -> Vec<usize> {
    let mut rows = vec![0, steps];
    let mask = U256::from((trace_domain - 1) as u64);
    while rows.len() < count {
        let raw = channel.draw_felt();
        let row = (raw & mask).as_limbs()[0] as usize;
        if row < trace_domain - 1 && !rows.contains(&row) {
            rows.push(row);
        }
    }
    rows
}

/// Verify a MiMC STARK proof.
pub fn verify_mimc_proof<H: Hash2>(
    public: &PublicInputs,
    proof: &Proof,
    params: &VerifierParams<H>,
) -> Result<VerificationResult, ProofError> {
    public.validate()?;
    let dims = Dimensions::new(public.steps, params.blowup, params.num_queries)?;
    proof.validate(&dims)?;
    let (layers, terminal) = proof.fri_parts()?;

    let mut context = VerificationContext::new(public, proof, dims, &params.hash);
    match context.check(&layers, terminal, params.trace_check) {
        Ok(()) => Ok(VerificationResult::accept()),
        Err(reason) => Ok(VerificationResult::reject(reason)),
    }
}

/// Ephemeral state for a single verification call.
struct VerificationContext<'a, H: Hash2> {
    public: &'a PublicInputs,
    proof: &'a Proof,
    dims: Dimensions,
    hash: &'a H,
    channel: Channel<'a, H>,
}

impl<'a, H: Hash2> VerificationContext<'a, H> {
    fn new(public: &'a PublicInputs, proof: &'a Proof, dims: Dimensions, hash: &'a H) -> Self {
        let seed = transcript_seed(hash, public);
        let mut channel = Channel::new(hash, seed);
        channel.commit(proof.root);
        channel.commit(proof.l_root);
        VerificationContext {
            public,
            proof,
            dims,
            hash,
            channel,
        }
    }

    fn check(
        &mut self,
        layers: &[&FriLayer],
        terminal: &DirectProof,
        trace_check: TraceCheck,
    ) -> Result<(), FailureReason> {
        // Step 1: claimed endpoint
        if trace_check == TraceCheck::DirectRecomputation {
            let end = mimc::iterate(
                self.public.input,
                self.public.steps,
                &self.public.round_constants,
            );
            if end != self.public.output {
                return Err(FailureReason::TraceMismatch);
            }
        }

        // Step 2: sampled rows
        let rows = draw_trace_rows(
            &mut self.channel,
            self.dims.num_queries,
            self.dims.trace_domain,
            self.public.steps,
        );
        self.check_trace_rows(&rows)?;

        // Step 3: FRI. Betas are drawn as the layer roots are committed;
        // query positions only after the terminal coefficients.
        let mut betas = Vec::with_capacity(layers.len());
        for layer in layers {
            betas.push(self.channel.draw_felt());
            self.channel.commit(layer.root);
        }
        for c in &terminal.coefficients {
            self.channel.commit(*c);
        }
        let positions = self
            .channel
            .draw_positions(self.dims.num_queries, self.dims.lde_domain);

        fri::verify_low_degree(
            self.hash,
            self.proof.l_root,
            layers,
            terminal,
            &betas,
            &positions,
            &self.dims,
        )
    }

    fn check_trace_rows(&mut self, rows: &[usize]) -> Result<(), FailureReason> {
        let constants = &self.public.round_constants;
        let trace_depth = self.dims.log_trace as usize;
        let lde_depth = self.dims.log_lde as usize;

        for (opening, &row) in self.proof.branches.iter().zip(rows) {
            // Boundary rows are pinned to the public statement.
            if row == 0 && opening.value != self.public.input {
                return Err(FailureReason::TraceMismatch);
            }
            if row == self.public.steps && opening.value != self.public.output {
                return Err(FailureReason::TraceMismatch);
            }

            // One MiMC round from this row to the next.
            if opening.next_value != mimc::round(opening.value, constants[row % constants.len()])
            {
                return Err(FailureReason::TraceMismatch);
            }

            // Row and successor against the trace commitment; the same row
            // value against the low-degree commitment at its extended slot.
            if !merkle::verify_branch(
                self.hash,
                self.proof.root,
                opening.value,
                row,
                &opening.branch,
                trace_depth,
            ) || !merkle::verify_branch(
                self.hash,
                self.proof.root,
                opening.next_value,
                row + 1,
                &opening.next_branch,
                trace_depth,
            ) || !merkle::verify_branch(
                self.hash,
                self.proof.l_root,
                opening.value,
                row * self.dims.blowup,
                &opening.low_degree_branch,
                lde_depth,
            ) {
                return Err(FailureReason::RootMismatch);
            }
        }

        Ok(())
    }
}
