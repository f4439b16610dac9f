//! Typed Proof Model
//!
//! Wire formats deserialize into these structures, which are validated
//! once at the input boundary. Everything downstream assumes the shapes
//! hold: branch depths, opening counts, field ranges, and the position of
//! the terminal FRI component are all checked here and nowhere else.

use alloy_primitives::U256;

use crate::domain::TWO_ADICITY;
use crate::error::ProofError;
use crate::field::MODULUS;

/// Public statement: `output` is reached from `input` after `steps` MiMC
/// rounds under the given constant schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicInputs {
    pub input: U256,
    pub output: U256,
    pub steps: usize,
    pub round_constants: Vec<U256>,
}

impl PublicInputs {
    pub fn validate(&self) -> Result<(), ProofError> {
        if self.round_constants.is_empty() {
            return Err(ProofError::MalformedProof(
                "empty round constant table".into(),
            ));
        }
        check_felt(self.input, "input")?;
        check_felt(self.output, "output")?;
        for k in &self.round_constants {
            check_felt(*k, "round constant")?;
        }
        Ok(())
    }
}

/// One sampled trace row: the row value and its successor, authenticated
/// against the trace commitment, plus the same row value authenticated
/// inside the low-degree commitment at its extended-domain slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceOpening {
    pub value: U256,
    pub next_value: U256,
    pub branch: Vec<U256>,
    pub next_branch: Vec<U256>,
    pub low_degree_branch: Vec<U256>,
}

/// One FRI query at one layer: f(x) and f(-x) against the previous
/// commitment, and the folded column value against this layer's own root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriQueryOpening {
    pub poly_value: U256,
    pub poly_branch: Vec<U256>,
    pub sym_value: U256,
    pub sym_branch: Vec<U256>,
    pub column_value: U256,
    pub column_branch: Vec<U256>,
}

/// An intermediate FRI layer: the column commitment plus one opening set
/// per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriLayer {
    pub root: U256,
    pub openings: Vec<FriQueryOpening>,
}

/// The terminal FRI component: the fully folded polynomial in the clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectProof {
    pub coefficients: Vec<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriComponent {
    Layer(FriLayer),
    Terminal(DirectProof),
}

/// A complete proof for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    /// Commitment to the execution trace.
    pub root: U256,
    /// Commitment to the low-degree extension of the trace polynomial.
    pub l_root: U256,
    /// Openings for the sampled trace rows, in transcript order.
    pub branches: Vec<TraceOpening>,
    /// FRI folding chain, oldest layer first, terminal last.
    pub fri_components: Vec<FriComponent>,
}

/// Sizes derived from the statement and the protocol parameters.
#[derive(Debug, Clone, Copy)]
pub struct Dimensions {
    /// Committed trace table size (power of two).
    pub trace_domain: usize,
    pub log_trace: u32,
    /// Extension blowup factor.
    pub blowup: usize,
    /// Extended evaluation domain size.
    pub lde_domain: usize,
    pub log_lde: u32,
    /// Number of intermediate FRI layers.
    pub num_layers: usize,
    /// Maximum coefficient count of the terminal polynomial.
    pub final_poly_bound: usize,
    /// Sampled rows and FRI queries per proof.
    pub num_queries: usize,
}

impl Dimensions {
    pub fn new(steps: usize, blowup: usize, num_queries: usize) -> Result<Self, ProofError> {
        if steps == 0 {
            return Err(ProofError::MalformedProof("steps must be positive".into()));
        }
        if !blowup.is_power_of_two() || blowup < 2 {
            return Err(ProofError::MalformedProof(
                "blowup must be a power of two of at least 2".into(),
            ));
        }
        if num_queries < 2 {
            // rows 0 and `steps` are always sampled
            return Err(ProofError::MalformedProof(
                "at least two queries are required".into(),
            ));
        }

        // Room for the endpoint row and one successor beyond it, so every
        // sampled row has a committed next row.
        let trace_domain = (steps + 2).next_power_of_two();
        if num_queries > trace_domain - 1 {
            return Err(ProofError::MalformedProof(
                "more queries than sampleable trace rows".into(),
            ));
        }

        let log_trace = trace_domain.trailing_zeros();
        let log_lde = log_trace + blowup.trailing_zeros();
        if log_lde > TWO_ADICITY {
            return Err(ProofError::MalformedProof(
                "trace exceeds the two-adic evaluation domain".into(),
            ));
        }

        let num_layers = core::cmp::max(1, (log_trace as usize).saturating_sub(2));
        let final_poly_bound = trace_domain >> num_layers;

        Ok(Dimensions {
            trace_domain,
            log_trace,
            blowup,
            lde_domain: trace_domain * blowup,
            log_lde,
            num_layers,
            final_poly_bound,
            num_queries,
        })
    }

    /// Evaluation domain size at FRI layer `layer`.
    pub fn layer_domain(&self, layer: usize) -> usize {
        self.lde_domain >> layer
    }

    /// Domain size the terminal polynomial is checked on.
    pub fn final_domain(&self) -> usize {
        self.lde_domain >> self.num_layers
    }
}

fn check_felt(v: U256, what: &'static str) -> Result<(), ProofError> {
    if v >= MODULUS {
        Err(ProofError::FieldRange { what })
    } else {
        Ok(())
    }
}

fn check_branch(branch: &[U256], depth: usize, what: &'static str) -> Result<(), ProofError> {
    if branch.len() != depth {
        return Err(ProofError::LengthMismatch {
            what,
            expected: depth,
            actual: branch.len(),
        });
    }
    for sibling in branch {
        check_felt(*sibling, what)?;
    }
    Ok(())
}

impl Proof {
    /// Validate shapes and ranges once at the input boundary.
    pub fn validate(&self, dims: &Dimensions) -> Result<(), ProofError> {
        check_felt(self.root, "trace root")?;
        check_felt(self.l_root, "low-degree root")?;

        if self.branches.len() != dims.num_queries {
            return Err(ProofError::LengthMismatch {
                what: "trace openings",
                expected: dims.num_queries,
                actual: self.branches.len(),
            });
        }
        let trace_depth = dims.log_trace as usize;
        let lde_depth = dims.log_lde as usize;
        for opening in &self.branches {
            check_felt(opening.value, "trace opening value")?;
            check_felt(opening.next_value, "trace opening value")?;
            check_branch(&opening.branch, trace_depth, "trace branch")?;
            check_branch(&opening.next_branch, trace_depth, "trace successor branch")?;
            check_branch(&opening.low_degree_branch, lde_depth, "low-degree branch")?;
        }

        if self.fri_components.len() != dims.num_layers + 1 {
            return Err(ProofError::LengthMismatch {
                what: "fri components",
                expected: dims.num_layers + 1,
                actual: self.fri_components.len(),
            });
        }
        for (i, component) in self.fri_components.iter().enumerate() {
            let last = i == self.fri_components.len() - 1;
            match component {
                FriComponent::Terminal(direct) if last => {
                    if direct.coefficients.is_empty() {
                        return Err(ProofError::MalformedProof("empty direct proof".into()));
                    }
                    for c in &direct.coefficients {
                        check_felt(*c, "direct proof coefficient")?;
                    }
                }
                FriComponent::Terminal(_) => {
                    return Err(ProofError::MalformedProof(
                        "terminal fri component before end of sequence".into(),
                    ));
                }
                FriComponent::Layer(_) if last => {
                    return Err(ProofError::MalformedProof(
                        "missing terminal fri component".into(),
                    ));
                }
                FriComponent::Layer(layer) => {
                    check_felt(layer.root, "fri layer root")?;
                    if layer.openings.len() != dims.num_queries {
                        return Err(ProofError::LengthMismatch {
                            what: "fri layer openings",
                            expected: dims.num_queries,
                            actual: layer.openings.len(),
                        });
                    }
                    let poly_depth = lde_depth - i;
                    for opening in &layer.openings {
                        check_felt(opening.poly_value, "fri opening value")?;
                        check_felt(opening.sym_value, "fri opening value")?;
                        check_felt(opening.column_value, "fri opening value")?;
                        check_branch(&opening.poly_branch, poly_depth, "fri poly branch")?;
                        check_branch(&opening.sym_branch, poly_depth, "fri poly branch")?;
                        check_branch(&opening.column_branch, poly_depth - 1, "fri column branch")?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Split the validated component sequence into layers and terminal.
    pub(crate) fn fri_parts(&self) -> Result<(Vec<&FriLayer>, &DirectProof), ProofError> {
        let mut layers = Vec::new();
        let mut terminal = None;
        for component in &self.fri_components {
            match component {
                FriComponent::Layer(layer) => layers.push(layer),
                FriComponent::Terminal(direct) => terminal = Some(direct),
            }
        }
        match terminal {
            Some(direct) => Ok((layers, direct)),
            None => Err(ProofError::MalformedProof(
                "missing terminal fri component".into(),
            )),
        }
    }
}
