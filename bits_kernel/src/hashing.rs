/// Bits Kernel v1 — Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing of outcomes.
/// Produces byte-identical output across platforms.
///
/// Rules:
///   - Outcomes sorted by sequence
///   - Outcome fields in fixed order: sequence, op, lhs, rhs, result
///   - UTF-8 JSON, no whitespace, integers only

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::{Outcome, ShiftPolicy};
use crate::KERNEL_VERSION;

/// Canonical serialization of an outcome set to UTF-8 JSON bytes.
/// kernel_version is always the first field.
pub fn canonical_serialize(policy: ShiftPolicy, outcomes: &[Outcome]) -> Vec<u8> {
    // Display on Value is infallible for maps with string keys.
    build_canonical_value(policy, outcomes).to_string().into_bytes()
}

/// SHA-256 of the canonical serialization. Lowercase hex string.
pub fn canonical_hash(policy: ShiftPolicy, outcomes: &[Outcome]) -> String {
    sha256_hex(&canonical_serialize(policy, outcomes))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Field order: kernel_version, shift_policy, outcomes
fn build_canonical_value(policy: ShiftPolicy, outcomes: &[Outcome]) -> Value {
    let mut sorted = outcomes.to_vec();
    sorted.sort_by_key(|o| o.sequence);

    let outcome_list: Vec<Value> = sorted
        .iter()
        .map(|o| {
            let mut m = Map::new();
            m.insert("sequence".to_string(), Value::from(o.sequence));
            m.insert("op".to_string(), Value::String(o.op.name().to_string()));
            m.insert("lhs".to_string(), Value::from(o.lhs));
            m.insert("rhs".to_string(), Value::from(o.rhs));
            m.insert("result".to_string(), Value::from(o.result));
            Value::Object(m)
        })
        .collect();

    let mut root = Map::new();
    root.insert(
        "kernel_version".to_string(),
        Value::from(KERNEL_VERSION),
    );
    root.insert(
        "shift_policy".to_string(),
        Value::String(policy.name().to_string()),
    );
    root.insert("outcomes".to_string(), Value::Array(outcome_list));
    Value::Object(root)
}
