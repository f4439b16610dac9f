//! MiMC STARK CLI
//!
//! Proves and verifies MiMC execution-trace statements.
//!
//! Usage:
//!   cargo run -- --steps 64
//!   cargo run -- --steps 64 --format json > proof.json
//!   cargo run -- --verify proof.json

#[cfg(feature = "cli")]
use clap::Parser;

/// MiMC STARK CLI
#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "mimc-stark")]
#[command(about = "Prove and verify MiMC execution traces")]
struct Args {
    /// Trace input value (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "3")]
    input: String,

    /// Number of MiMC rounds
    #[arg(long, default_value_t = 64)]
    steps: usize,

    /// Number of sampled rows and FRI queries
    #[arg(long, default_value_t = 20)]
    num_queries: usize,

    /// Trace endpoint check: direct or sampled
    #[arg(long, default_value = "direct")]
    trace_check: String,

    /// Output format for a generated proof: summary or json
    #[arg(long, default_value = "summary")]
    format: String,

    /// Verify a JSON proof file instead of generating one
    #[arg(long)]
    verify: Option<std::path::PathBuf>,
}

fn main() {
    #[cfg(feature = "cli")]
    {
        use alloy_primitives::U256;
        use mimc_stark::proof::FriComponent;
        use mimc_stark::{
            codec, prover, verify_mimc_proof, Keccak256Compression, TraceCheck, VerifierParams,
        };

        let args = Args::parse();

        let trace_check = match args.trace_check.as_str() {
            "direct" => TraceCheck::DirectRecomputation,
            "sampled" => TraceCheck::SampledConsistency,
            other => {
                eprintln!("Unknown trace check: {other}. Use 'direct' or 'sampled'.");
                std::process::exit(2);
            }
        };
        let params = VerifierParams {
            hash: Keccak256Compression,
            blowup: 4,
            num_queries: args.num_queries,
            trace_check,
        };

        // Verify an existing proof file.
        if let Some(path) = &args.verify {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Cannot read {}: {e}", path.display());
                    std::process::exit(2);
                }
            };
            let (public, proof) = match codec::proof_from_json(&text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("Structurally invalid proof: {e}");
                    std::process::exit(2);
                }
            };
            match verify_mimc_proof(&public, &proof, &params) {
                Ok(result) if result.accepted => println!("Proof accepted"),
                Ok(result) => {
                    match result.failure {
                        Some(reason) => println!("Proof rejected: {reason}"),
                        None => println!("Proof rejected"),
                    }
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Structurally invalid proof: {e}");
                    std::process::exit(2);
                }
            }
            return;
        }

        // Prove a demo statement, then verify it.
        let input = match codec::parse_felt(&args.input, "input") {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Bad input value: {e}");
                std::process::exit(2);
            }
        };
        let round_constants: Vec<U256> =
            (0..64u64).map(|i| U256::from(i.pow(7) ^ 42)).collect();

        println!("=== MiMC STARK ===");
        println!("Steps: {}", args.steps);
        println!("Queries: {}", args.num_queries);

        let (public, proof) = match prover::prove(input, args.steps, &round_constants, &params) {
            Ok(generated) => generated,
            Err(e) => {
                eprintln!("Proving failed: {e}");
                std::process::exit(2);
            }
        };
        println!("Output: 0x{:x}", public.output);

        match args.format.as_str() {
            "json" => match codec::proof_to_json(&public, &proof) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("Serialization failed: {e}");
                    std::process::exit(2);
                }
            },
            _ => {
                let layers = proof
                    .fri_components
                    .iter()
                    .filter(|c| matches!(c, FriComponent::Layer(_)))
                    .count();
                let terminal_len = proof
                    .fri_components
                    .iter()
                    .find_map(|c| match c {
                        FriComponent::Terminal(direct) => Some(direct.coefficients.len()),
                        _ => None,
                    })
                    .unwrap_or(0);
                println!("Trace openings: {}", proof.branches.len());
                println!("FRI layers: {layers}");
                println!("Terminal coefficients: {terminal_len}");
            }
        }

        match verify_mimc_proof(&public, &proof, &params) {
            Ok(result) if result.accepted => println!("Self-check: accepted"),
            Ok(result) => {
                println!("Self-check: rejected ({:?})", result.failure);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Self-check failed structurally: {e}");
                std::process::exit(2);
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("CLI feature not enabled. Build with: cargo run --features cli");
    }
}
