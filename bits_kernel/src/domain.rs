/// Bits Kernel v1 — Core Domain Types
///
/// Pure data. Evaluation lives in `engine`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

// ── Operations ─────────────────────────────────────────────────────

/// The four bit operations the kernel knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOp {
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Xor,
}

impl BitOp {
    pub const ALL: [BitOp; 4] = [
        BitOp::ShiftLeft,
        BitOp::ShiftRight,
        BitOp::UnsignedShiftRight,
        BitOp::Xor,
    ];

    /// Canonical snake_case name, identical to the serde form.
    pub fn name(self) -> &'static str {
        match self {
            BitOp::ShiftLeft => "shift_left",
            BitOp::ShiftRight => "shift_right",
            BitOp::UnsignedShiftRight => "unsigned_shift_right",
            BitOp::Xor => "xor",
        }
    }

    pub fn parse(name: &str) -> Result<BitOp, KernelError> {
        BitOp::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| KernelError::UnknownOperation(name.to_string()))
    }

    /// True when `rhs` is a shift count rather than a second operand.
    pub fn is_shift(self) -> bool {
        !matches!(self, BitOp::Xor)
    }
}

impl fmt::Display for BitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One call of a bit operation.
///
/// For shifts `lhs` is the value and `rhs` the shift count;
/// for xor both are operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    pub op: BitOp,
    pub lhs: i32,
    pub rhs: i32,
}

impl Operation {
    pub fn new(op: BitOp, lhs: i32, rhs: i32) -> Self {
        Self { op, lhs, rhs }
    }
}

/// An evaluated operation — the unit of hashing and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outcome {
    pub sequence: u64,
    pub op: BitOp,
    pub lhs: i32,
    pub rhs: i32,
    pub result: i32,
}

impl Outcome {
    pub fn operation(&self) -> Operation {
        Operation::new(self.op, self.lhs, self.rhs)
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// How the engine treats shift counts outside `[0, 31]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPolicy {
    /// Keep the low 5 bits of the count. Same as the free functions.
    #[default]
    Mask,
    /// Reject out-of-range counts.
    Strict,
}

impl ShiftPolicy {
    pub fn name(self) -> &'static str {
        match self {
            ShiftPolicy::Mask => "mask",
            ShiftPolicy::Strict => "strict",
        }
    }
}

/// Kernel configuration, injected into every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KernelConfig {
    #[serde(default)]
    pub shift_policy: ShiftPolicy,
}

impl KernelConfig {
    pub fn with_policy(shift_policy: ShiftPolicy) -> Self {
        Self { shift_policy }
    }

    pub fn from_json(json: &str) -> Result<Self, KernelError> {
        Ok(serde_json::from_str(json)?)
    }
}
