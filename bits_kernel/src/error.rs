use thiserror::Error;

/// Failures raised by the evaluation engine and its inputs.
/// The four bit primitives themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("Schema version mismatch: expected {expected}, got {got}")]
    SchemaVersion { expected: u32, got: u32 },

    #[error("Sequence error: expected {expected}, got {got}")]
    Sequence { expected: u64, got: u64 },

    #[error("Unknown operation {0:?}")]
    UnknownOperation(String),

    /// Only raised under `ShiftPolicy::Strict`.
    #[error("Shift count {positions} out of range [0, 31] for {op}")]
    ShiftOutOfRange { op: String, positions: i32 },

    #[error("Expectation mismatch at sequence {sequence}: expected {expected}, got {got}")]
    ExpectationMismatch { sequence: u64, expected: i32, got: i32 },

    #[error("Property violation: {0}")]
    PropertyViolation(String),

    #[error("Malformed input: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        KernelError::Malformed(err.to_string())
    }
}
