//! Drift detection — determinism verification and run comparison.

use std::collections::{BTreeMap, BTreeSet};

use bits_kernel::domain::{KernelConfig, Outcome};
use bits_kernel::vectors::TestVector;

use crate::error::RuntimeError;
use crate::replay;

/// Replay the same vectors twice and require identical hashes.
pub fn verify_determinism(vectors: &[TestVector], config: KernelConfig) -> Result<String, RuntimeError> {
    let hash1 = replay::rebuild_hash(vectors, config)?;
    let hash2 = replay::rebuild_hash(vectors, config)?;

    if hash1 != hash2 {
        return Err(RuntimeError::Determinism(hash1, hash2));
    }
    Ok(hash1)
}

/// Compare two outcome runs keyed by sequence.
pub fn compare_runs(run_a: &[Outcome], run_b: &[Outcome]) -> DriftReport {
    let by_seq_a: BTreeMap<u64, &Outcome> = run_a.iter().map(|o| (o.sequence, o)).collect();
    let by_seq_b: BTreeMap<u64, &Outcome> = run_b.iter().map(|o| (o.sequence, o)).collect();

    let seqs_a: BTreeSet<u64> = by_seq_a.keys().copied().collect();
    let seqs_b: BTreeSet<u64> = by_seq_b.keys().copied().collect();

    let added: Vec<u64> = seqs_b.difference(&seqs_a).copied().collect();
    let removed: Vec<u64> = seqs_a.difference(&seqs_b).copied().collect();

    let mut operation_changed = Vec::new();
    let mut result_changed = Vec::new();
    for seq in seqs_a.intersection(&seqs_b) {
        let (a, b) = (by_seq_a[seq], by_seq_b[seq]);
        if a.operation() != b.operation() {
            operation_changed.push(*seq);
        } else if a.result != b.result {
            result_changed.push(*seq);
        }
    }

    DriftReport {
        count_a: run_a.len() as i64,
        count_b: run_b.len() as i64,
        count_delta: run_b.len() as i64 - run_a.len() as i64,
        added_sequences: added,
        removed_sequences: removed,
        operation_changed,
        result_changed,
    }
}

/// Structured drift report. Sequence lists are ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    pub count_a: i64,
    pub count_b: i64,
    pub count_delta: i64,
    pub added_sequences: Vec<u64>,
    pub removed_sequences: Vec<u64>,
    /// Same sequence, different operation or operands.
    pub operation_changed: Vec<u64>,
    /// Same operation, different result.
    pub result_changed: Vec<u64>,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.count_delta == 0
            && self.added_sequences.is_empty()
            && self.removed_sequences.is_empty()
            && self.operation_changed.is_empty()
            && self.result_changed.is_empty()
    }
}
