//! JSON Proof Boundary
//!
//! Serde model of the proof wire format. Field elements travel as decimal
//! or 0x-prefixed hex strings and are range-checked while the typed model
//! is built; anything that does not parse is rejected at this boundary
//! instead of flowing into verification.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::ProofError;
use crate::field::MODULUS;
use crate::proof::{
    DirectProof, FriComponent, FriLayer, FriQueryOpening, Proof, PublicInputs, TraceOpening,
};

/// Parse a field element from a decimal or 0x-prefixed hex string.
pub fn parse_felt(s: &str, what: &'static str) -> Result<U256, ProofError> {
    let trimmed = s.trim();
    let value = if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if digits.is_empty() || digits.len() > 64 {
            return Err(bad_felt(what));
        }
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let bytes = hex::decode(&padded).map_err(|_| bad_felt(what))?;
        U256::from_be_slice(&bytes)
    } else {
        U256::from_str_radix(trimmed, 10).map_err(|_| bad_felt(what))?
    };

    if value >= MODULUS {
        return Err(ProofError::FieldRange { what });
    }
    Ok(value)
}

fn bad_felt(what: &str) -> ProofError {
    ProofError::MalformedProof(format!("invalid field element in {what}"))
}

fn format_felt(v: &U256) -> String {
    format!("0x{v:064x}")
}

fn parse_felts(values: &[String], what: &'static str) -> Result<Vec<U256>, ProofError> {
    values.iter().map(|s| parse_felt(s, what)).collect()
}

fn format_felts(values: &[U256]) -> Vec<String> {
    values.iter().map(format_felt).collect()
}

// --- wire model ---

#[derive(Debug, Serialize, Deserialize)]
struct ProofFile {
    input: String,
    steps: usize,
    output: String,
    round_constants: Vec<String>,
    proof: ProofWire,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProofWire {
    root: String,
    #[serde(rename = "lRoot")]
    l_root: String,
    branches: Vec<TraceOpeningWire>,
    fri_components: FriComponentsWire,
}

#[derive(Debug, Serialize, Deserialize)]
struct TraceOpeningWire {
    value: String,
    next_value: String,
    branch: Vec<String>,
    next_branch: Vec<String>,
    low_degree_branch: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FriComponentsWire {
    root2: Vec<String>,
    branches2: Branches2Wire,
    direct_proof: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Branches2Wire {
    branch_for_columns: Vec<Vec<ColumnOpeningWire>>,
    branch_for_polys: Vec<Vec<PolyOpeningWire>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ColumnOpeningWire {
    value: String,
    branch: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PolyOpeningWire {
    value: String,
    branch: Vec<String>,
    sym_value: String,
    sym_branch: Vec<String>,
}

// --- decoding ---

/// Parse a statement and proof from JSON.
pub fn proof_from_json(text: &str) -> Result<(PublicInputs, Proof), ProofError> {
    let file: ProofFile = serde_json::from_str(text)
        .map_err(|e| ProofError::MalformedProof(format!("invalid proof json: {e}")))?;

    let public = PublicInputs {
        input: parse_felt(&file.input, "input")?,
        output: parse_felt(&file.output, "output")?,
        steps: file.steps,
        round_constants: parse_felts(&file.round_constants, "round constant")?,
    };

    let wire = file.proof;
    let branches = wire
        .branches
        .iter()
        .map(|b| {
            Ok(TraceOpening {
                value: parse_felt(&b.value, "trace opening value")?,
                next_value: parse_felt(&b.next_value, "trace opening value")?,
                branch: parse_felts(&b.branch, "trace branch")?,
                next_branch: parse_felts(&b.next_branch, "trace successor branch")?,
                low_degree_branch: parse_felts(&b.low_degree_branch, "low-degree branch")?,
            })
        })
        .collect::<Result<Vec<_>, ProofError>>()?;

    let fri = &wire.fri_components;
    if fri.branches2.branch_for_columns.len() != fri.root2.len()
        || fri.branches2.branch_for_polys.len() != fri.root2.len()
    {
        return Err(ProofError::MalformedProof(
            "fri component arrays disagree on layer count".into(),
        ));
    }

    let mut fri_components = Vec::with_capacity(fri.root2.len() + 1);
    for (i, root) in fri.root2.iter().enumerate() {
        let columns = &fri.branches2.branch_for_columns[i];
        let polys = &fri.branches2.branch_for_polys[i];
        if columns.len() != polys.len() {
            return Err(ProofError::MalformedProof(
                "fri layer opening counts disagree".into(),
            ));
        }
        let openings = polys
            .iter()
            .zip(columns)
            .map(|(p, c)| {
                Ok(FriQueryOpening {
                    poly_value: parse_felt(&p.value, "fri opening value")?,
                    poly_branch: parse_felts(&p.branch, "fri poly branch")?,
                    sym_value: parse_felt(&p.sym_value, "fri opening value")?,
                    sym_branch: parse_felts(&p.sym_branch, "fri poly branch")?,
                    column_value: parse_felt(&c.value, "fri opening value")?,
                    column_branch: parse_felts(&c.branch, "fri column branch")?,
                })
            })
            .collect::<Result<Vec<_>, ProofError>>()?;
        fri_components.push(FriComponent::Layer(FriLayer {
            root: parse_felt(root, "fri layer root")?,
            openings,
        }));
    }
    fri_components.push(FriComponent::Terminal(DirectProof {
        coefficients: parse_felts(&fri.direct_proof, "direct proof coefficient")?,
    }));

    let proof = Proof {
        root: parse_felt(&wire.root, "trace root")?,
        l_root: parse_felt(&wire.l_root, "low-degree root")?,
        branches,
        fri_components,
    };

    Ok((public, proof))
}

// --- encoding ---

/// Serialize a statement and proof to JSON.
pub fn proof_to_json(public: &PublicInputs, proof: &Proof) -> Result<String, serde_json::Error> {
    let mut root2 = Vec::new();
    let mut branch_for_columns = Vec::new();
    let mut branch_for_polys = Vec::new();
    let mut direct_proof = Vec::new();

    for component in &proof.fri_components {
        match component {
            FriComponent::Layer(layer) => {
                root2.push(format_felt(&layer.root));
                branch_for_columns.push(
                    layer
                        .openings
                        .iter()
                        .map(|o| ColumnOpeningWire {
                            value: format_felt(&o.column_value),
                            branch: format_felts(&o.column_branch),
                        })
                        .collect(),
                );
                branch_for_polys.push(
                    layer
                        .openings
                        .iter()
                        .map(|o| PolyOpeningWire {
                            value: format_felt(&o.poly_value),
                            branch: format_felts(&o.poly_branch),
                            sym_value: format_felt(&o.sym_value),
                            sym_branch: format_felts(&o.sym_branch),
                        })
                        .collect(),
                );
            }
            FriComponent::Terminal(direct) => {
                direct_proof = format_felts(&direct.coefficients);
            }
        }
    }

    let file = ProofFile {
        input: format_felt(&public.input),
        steps: public.steps,
        output: format_felt(&public.output),
        round_constants: format_felts(&public.round_constants),
        proof: ProofWire {
            root: format_felt(&proof.root),
            l_root: format_felt(&proof.l_root),
            branches: proof
                .branches
                .iter()
                .map(|b| TraceOpeningWire {
                    value: format_felt(&b.value),
                    next_value: format_felt(&b.next_value),
                    branch: format_felts(&b.branch),
                    next_branch: format_felts(&b.next_branch),
                    low_degree_branch: format_felts(&b.low_degree_branch),
                })
                .collect(),
            fri_components: FriComponentsWire {
                root2,
                branches2: Branches2Wire {
                    branch_for_columns,
                    branch_for_polys,
                },
                direct_proof,
            },
        },
    };

    serde_json::to_string_pretty(&file)
}
