/// Golden determinism test — evaluates the frozen vector stream
/// and asserts the canonical hash matches the permanent v1 value.
///
/// This test must NEVER be modified to match new behavior.
/// If it fails, the kernel has been broken.

use std::fs;

use bits_kernel::domain::{KernelConfig, ShiftPolicy};
use bits_kernel::engine::BitEngine;
use bits_kernel::hashing::canonical_hash;
use bits_kernel::vectors::{load_vectors, TestVector};
use bits_kernel::KERNEL_VERSION;

fn load_golden_vectors(path: &str) -> Vec<TestVector> {
    let data = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    load_vectors(&data).expect("Failed to parse golden vectors")
}

fn load_expected_hash(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
        .trim()
        .to_string()
}

fn run(vectors: &[TestVector]) -> String {
    let mut engine = BitEngine::new(KernelConfig::default());
    engine.apply_all(vectors).expect("golden vectors must evaluate");
    canonical_hash(ShiftPolicy::Mask, engine.outcomes())
}

#[test]
fn golden_vectors_hash_matches() {
    let vectors = load_golden_vectors("tests/golden/vectors.json");
    let hash = run(&vectors);

    let expected = load_expected_hash("tests/golden/expected_hash.txt");
    assert_eq!(
        hash, expected,
        "GOLDEN TEST FAILED: Kernel v1 evaluation produced a different hash.\n\
         This means the kernel behavior has changed — this is forbidden.\n\
         Got:      {}\n\
         Expected: {}",
        hash, expected
    );
}

#[test]
fn golden_vectors_are_deterministic() {
    let vectors = load_golden_vectors("tests/golden/vectors.json");
    let h1 = run(&vectors);
    let h2 = run(&vectors);
    assert_eq!(
        h1, h2,
        "DETERMINISM FAILURE: two evaluations of the same vectors produced different hashes.\n\
         Run 1: {}\n\
         Run 2: {}",
        h1, h2
    );
}

#[test]
fn golden_vectors_cover_every_op() {
    let vectors = load_golden_vectors("tests/golden/vectors.json");
    for op in bits_kernel::domain::BitOp::ALL {
        assert!(
            vectors.iter().any(|v| v.operation.op == op),
            "golden stream has no {} vector",
            op
        );
    }
}

#[test]
fn golden_vectors_fail_under_strict_policy() {
    let vectors = load_golden_vectors("tests/golden/vectors.json");
    let mut engine = BitEngine::new(KernelConfig::with_policy(ShiftPolicy::Strict));
    assert!(engine.apply_all(&vectors).is_err());
    // Sequence 6 shifts by 32.
    assert_eq!(engine.last_sequence(), 5);
}

#[test]
fn kernel_version_is_one() {
    assert_eq!(KERNEL_VERSION, 1, "Kernel version must be 1");
}
