/// Bits Kernel v1 — Cross-Language Vector Harness
///
/// Loads vector fixtures produced by another implementation,
/// evaluates them twice through the kernel, and compares hashes.
///
/// Fixture file: a JSON array of
///   { "name": ..., "shift_policy": "mask" | "strict",
///     "vectors": [...], "expected_hash": "..." }
/// `shift_policy` and `expected_hash` are optional.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use serde_json::Value;
use tracing::info;

use bits_kernel::domain::{KernelConfig, ShiftPolicy};
use bits_kernel::engine::BitEngine;
use bits_kernel::hashing::canonical_hash;
use bits_kernel::logging::initialize_logger;
use bits_kernel::vectors::TestVector;
use bits_kernel::KernelError;

const FIXTURE_PATHS: [&str; 3] = [
    "test_fixtures.json",
    "../test_fixtures.json",
    "bits_kernel/test_fixtures.json",
];

fn main() -> ExitCode {
    initialize_logger();

    let Some(path) = FIXTURE_PATHS.iter().find(|p| Path::new(p).exists()) else {
        eprintln!("Could not find test_fixtures.json in any of {:?}", FIXTURE_PATHS);
        return ExitCode::FAILURE;
    };
    info!(path = %path, "loading fixtures");

    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    let fixtures = match parse_fixtures(&data) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Invalid fixtures in {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let total = fixtures.len();
    let mut passed = 0;

    for fixture in &fixtures {
        match run_fixture(fixture) {
            Ok(hash) => {
                passed += 1;
                println!(
                    "[PASS] {}: vectors={}, hash={}",
                    fixture.name,
                    fixture.vectors.len(),
                    hash
                );
            }
            Err(reason) => println!("[FAIL] {}: {}", fixture.name, reason),
        }
    }

    println!("\n===========================================");
    println!("Results: {}/{} passed", passed, total);
    if passed == total {
        println!("[OK] All cross-language vector checks PASSED.");
        ExitCode::SUCCESS
    } else {
        println!("[FAIL] Some checks failed.");
        ExitCode::FAILURE
    }
}

struct Fixture {
    name: String,
    config: KernelConfig,
    vectors: Vec<TestVector>,
    expected_hash: Option<String>,
}

fn parse_fixtures(data: &str) -> Result<Vec<Fixture>, KernelError> {
    let raw: Vec<Value> = serde_json::from_str(data)?;
    raw.iter().map(parse_fixture).collect()
}

fn parse_fixture(v: &Value) -> Result<Fixture, KernelError> {
    let shift_policy: ShiftPolicy = match v.get("shift_policy") {
        Some(p) => serde_json::from_value(p.clone())?,
        None => ShiftPolicy::default(),
    };
    let vectors = v["vectors"]
        .as_array()
        .ok_or_else(|| KernelError::Malformed("fixture has no \"vectors\" array".to_string()))?
        .iter()
        .map(TestVector::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Fixture {
        name: v["name"].as_str().unwrap_or("<unnamed>").to_string(),
        config: KernelConfig::with_policy(shift_policy),
        vectors,
        expected_hash: v["expected_hash"].as_str().map(str::to_string),
    })
}

/// Evaluate a fixture twice. Returns the hash, or the reason it failed.
fn run_fixture(fixture: &Fixture) -> Result<String, String> {
    let h1 = evaluate_fixture(fixture).map_err(|e| e.to_string())?;
    let h2 = evaluate_fixture(fixture).map_err(|e| e.to_string())?;

    if h1 != h2 {
        return Err(format!("Determinism fail: run1={} run2={}", h1, h2));
    }
    if let Some(expected) = &fixture.expected_hash {
        if &h1 != expected {
            return Err(format!("Hash mismatch: rust={} fixture={}", h1, expected));
        }
    }
    Ok(h1)
}

fn evaluate_fixture(fixture: &Fixture) -> Result<String, KernelError> {
    let mut engine = BitEngine::new(fixture.config);
    engine.apply_all(&fixture.vectors)?;
    Ok(canonical_hash(
        fixture.config.shift_policy,
        engine.outcomes(),
    ))
}
