//! MiMC STARK Verifier
//!
//! Verifies STARK proofs for MiMC execution traces: Merkle-authenticated
//! trace openings with a MiMC transition check per sampled row, a linkage
//! between the trace commitment and its low-degree extension, and a FRI
//! folding chain ending in an explicit terminal polynomial.
//!
//! The verifier is a pure, synchronous function over immutable inputs; all
//! challenges are derived from a deterministic Fiat-Shamir transcript. A
//! reference prover is included for tests, demos, and fixture generation.

pub mod channel;
pub mod codec;
pub mod domain;
pub mod error;
pub mod field;
pub mod fri;
pub mod hash;
pub mod merkle;
pub mod mimc;
pub mod proof;
pub mod prover;
pub mod stark;

pub use error::{FailureReason, FieldError, ProofError, VerificationResult};
pub use hash::{Hash2, Keccak256Compression, MimcCompression};
pub use proof::{Dimensions, Proof, PublicInputs};
pub use stark::{verify_mimc_proof, TraceCheck, VerifierParams};
