//! Replay orchestrator — rebuild outcomes from a vector log.
//!
//! Delegates all evaluation to the kernel. No cached results.

use bits_kernel::domain::{KernelConfig, Outcome};
use bits_kernel::engine::BitEngine;
use bits_kernel::hashing::canonical_hash;
use bits_kernel::vectors::TestVector;

use crate::error::RuntimeError;

/// Rebuild the outcome set from a sequence of vectors.
///
/// 1. Create a fresh engine with `config`
/// 2. Apply each vector in order
/// 3. Return (outcomes, canonical_hash)
pub fn rebuild_outcomes(
    vectors: &[TestVector],
    config: KernelConfig,
) -> Result<(Vec<Outcome>, String), RuntimeError> {
    let mut engine = BitEngine::new(config);
    engine.apply_all(vectors)?;

    let outcomes = engine.outcomes().to_vec();
    let hash = canonical_hash(config.shift_policy, &outcomes);
    Ok((outcomes, hash))
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash(vectors: &[TestVector], config: KernelConfig) -> Result<String, RuntimeError> {
    let (_, hash) = rebuild_outcomes(vectors, config)?;
    Ok(hash)
}
