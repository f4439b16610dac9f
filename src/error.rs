//! Error Taxonomy
//!
//! Two tiers. Structural errors (`ProofError`) mean the input could not be
//! evaluated at all and are fatal to the call. A well-formed proof that
//! fails a check is not an error: verification returns
//! `accepted = false` together with an optional diagnostic reason.

use core::fmt;

use thiserror::Error;

/// Field arithmetic failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Structural rejection: the input does not conform to the expected proof
/// shape. Never raised for a proof that is merely wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("field element out of range: {what}")]
    FieldRange { what: &'static str },

    #[error("length mismatch in {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Why a well-formed proof was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// A Merkle opening did not authenticate against its committed root.
    RootMismatch,
    /// A sampled trace row disagreed with the MiMC transition or with the
    /// public statement.
    TraceMismatch,
    /// A folded value disagreed with the committed next layer.
    FoldingInconsistency,
    /// The terminal polynomial exceeds the final degree bound.
    TerminalDegreeExceeded,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::RootMismatch => "merkle root mismatch",
            FailureReason::TraceMismatch => "trace inconsistency",
            FailureReason::FoldingInconsistency => "fri folding inconsistency",
            FailureReason::TerminalDegreeExceeded => "terminal degree bound exceeded",
        };
        f.write_str(s)
    }
}

/// Outcome of verifying a well-formed proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationResult {
    pub accepted: bool,
    pub failure: Option<FailureReason>,
}

impl VerificationResult {
    pub fn accept() -> Self {
        VerificationResult {
            accepted: true,
            failure: None,
        }
    }

    pub fn reject(reason: FailureReason) -> Self {
        VerificationResult {
            accepted: false,
            failure: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_constructors() {
        let ok = VerificationResult::accept();
        assert!(ok.accepted);
        assert!(ok.failure.is_none());

        let bad = VerificationResult::reject(FailureReason::RootMismatch);
        assert!(!bad.accepted);
        assert_eq!(bad.failure, Some(FailureReason::RootMismatch));
    }

    #[test]
    fn test_error_display() {
        let e = ProofError::LengthMismatch {
            what: "trace branch",
            expected: 7,
            actual: 0,
        };
        assert_eq!(
            e.to_string(),
            "length mismatch in trace branch: expected 7, got 0"
        );
    }
}
