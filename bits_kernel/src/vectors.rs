/// Bits Kernel v1 — Test Vectors
///
/// A vector is an operation plus an optional expected result.
/// Vectors carry no evaluation logic.
///
/// JSON form:
///   { "sequence": 1, "op": "shift_left", "lhs": 1, "rhs": 4,
///     "expected": 16, "schema_version": 1 }
/// `expected` and `schema_version` may be omitted.

use serde_json::{Map, Value};

use crate::domain::{BitOp, Operation};
use crate::error::KernelError;

/// Schema version for v1 vectors. Vectors with any other version are rejected.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector {
    pub sequence: u64,
    pub operation: Operation,
    pub expected: Option<i32>,
    pub schema_version: u32,
}

impl TestVector {
    pub fn new(sequence: u64, op: BitOp, lhs: i32, rhs: i32) -> Self {
        Self {
            sequence,
            operation: Operation::new(op, lhs, rhs),
            expected: None,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn expecting(mut self, expected: i32) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Field order: sequence, op, lhs, rhs, expected (if any), schema_version.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("sequence".to_string(), Value::from(self.sequence));
        map.insert(
            "op".to_string(),
            Value::String(self.operation.op.name().to_string()),
        );
        map.insert("lhs".to_string(), Value::from(self.operation.lhs));
        map.insert("rhs".to_string(), Value::from(self.operation.rhs));
        if let Some(expected) = self.expected {
            map.insert("expected".to_string(), Value::from(expected));
        }
        map.insert(
            "schema_version".to_string(),
            Value::from(self.schema_version),
        );
        Value::Object(map)
    }

    pub fn from_value(v: &Value) -> Result<Self, KernelError> {
        let sequence = v["sequence"]
            .as_u64()
            .ok_or_else(|| malformed(v, "sequence"))?;
        let op_name = v["op"].as_str().ok_or_else(|| malformed(v, "op"))?;
        let op = BitOp::parse(op_name)?;
        let lhs = read_i32(v, "lhs")?;
        let rhs = read_i32(v, "rhs")?;
        let expected = match v.get("expected") {
            None | Some(Value::Null) => None,
            Some(_) => Some(read_i32(v, "expected")?),
        };
        let schema_version = match v.get("schema_version") {
            None => SCHEMA_VERSION,
            Some(raw) => raw
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| malformed(v, "schema_version"))?,
        };

        Ok(Self {
            sequence,
            operation: Operation::new(op, lhs, rhs),
            expected,
            schema_version,
        })
    }
}

/// Parse a JSON array of vectors.
pub fn load_vectors(json: &str) -> Result<Vec<TestVector>, KernelError> {
    let arr: Vec<Value> = serde_json::from_str(json)?;
    arr.iter().map(TestVector::from_value).collect()
}

/// Number a list of operations 1..=n.
pub fn number_operations(ops: &[Operation]) -> Vec<TestVector> {
    ops.iter()
        .zip(1u64..)
        .map(|(op, seq)| TestVector::new(seq, op.op, op.lhs, op.rhs))
        .collect()
}

fn read_i32(v: &Value, field: &str) -> Result<i32, KernelError> {
    v[field]
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| malformed(v, field))
}

fn malformed(v: &Value, field: &str) -> KernelError {
    KernelError::Malformed(format!("field {:?} missing or invalid in {}", field, v))
}
