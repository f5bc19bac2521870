/// Bits Kernel v1 — Engine
///
/// Evaluates vectors under a `KernelConfig` and records outcomes.
/// Strict sequence enforcement; a rejected vector leaves the engine untouched.

use tracing::{debug, warn};

use crate::bits::{shift_left, shift_right, unsigned_shift_right, xor, WIDTH};
use crate::domain::{BitOp, KernelConfig, Operation, Outcome, ShiftPolicy};
use crate::error::KernelError;
use crate::vectors::{TestVector, SCHEMA_VERSION};

/// Evaluate a single operation. Pure.
///
/// Under `ShiftPolicy::Strict` a shift count outside `[0, 31]` is an error;
/// under `Mask` every input is accepted.
pub fn evaluate(operation: &Operation, policy: ShiftPolicy) -> Result<i32, KernelError> {
    let Operation { op, lhs, rhs } = *operation;

    if policy == ShiftPolicy::Strict && op.is_shift() && !(0..WIDTH as i32).contains(&rhs) {
        return Err(KernelError::ShiftOutOfRange {
            op: op.name().to_string(),
            positions: rhs,
        });
    }

    Ok(match op {
        BitOp::ShiftLeft => shift_left(lhs, rhs),
        BitOp::ShiftRight => shift_right(lhs, rhs),
        BitOp::UnsignedShiftRight => unsigned_shift_right(lhs, rhs),
        BitOp::Xor => xor(lhs, rhs),
    })
}

/// Stateful engine over the pure `evaluate`.
#[derive(Debug, Clone, Default)]
pub struct BitEngine {
    config: KernelConfig,
    outcomes: Vec<Outcome>,
    last_sequence: u64,
}

impl BitEngine {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            outcomes: Vec::new(),
            last_sequence: 0,
        }
    }

    pub fn config(&self) -> KernelConfig {
        self.config
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Rebuild an engine from previously recorded outcomes.
    /// Outcomes must be numbered 1..=n in order.
    pub fn from_outcomes(config: KernelConfig, outcomes: Vec<Outcome>) -> Result<Self, KernelError> {
        for (outcome, expected) in outcomes.iter().zip(1u64..) {
            if outcome.sequence != expected {
                return Err(KernelError::Sequence {
                    expected,
                    got: outcome.sequence,
                });
            }
        }
        let last_sequence = outcomes.len() as u64;
        Ok(Self {
            config,
            outcomes,
            last_sequence,
        })
    }

    /// Drop all outcomes and restart the sequence at 1.
    pub fn reset(&mut self) {
        self.outcomes.clear();
        self.last_sequence = 0;
    }

    /// Discard every outcome after `sequence`.
    pub fn rollback_to(&mut self, sequence: u64) {
        self.outcomes.retain(|o| o.sequence <= sequence);
        self.last_sequence = self.last_sequence.min(sequence);
    }

    /// Apply a single vector:
    ///   1. Validate schema version (must be 1)
    ///   2. Validate sequence (strictly increasing, no gaps)
    ///   3. Evaluate under the configured shift policy
    ///   4. Check the expected result, if any
    ///   5. Record and return the outcome
    pub fn apply(&mut self, vector: &TestVector) -> Result<&Outcome, KernelError> {
        match self.check_and_evaluate(vector) {
            Ok(outcome) => {
                debug!(
                    sequence = outcome.sequence,
                    op = %outcome.op,
                    lhs = outcome.lhs,
                    rhs = outcome.rhs,
                    result = outcome.result,
                    "applied vector"
                );
                self.last_sequence = outcome.sequence;
                self.outcomes.push(outcome);
                Ok(&self.outcomes[self.outcomes.len() - 1])
            }
            Err(err) => {
                warn!(sequence = vector.sequence, error = %err, "rejected vector");
                Err(err)
            }
        }
    }

    /// Apply vectors in order, stopping at the first failure.
    pub fn apply_all(&mut self, vectors: &[TestVector]) -> Result<(), KernelError> {
        for vector in vectors {
            self.apply(vector)?;
        }
        Ok(())
    }

    fn check_and_evaluate(&self, vector: &TestVector) -> Result<Outcome, KernelError> {
        if vector.schema_version != SCHEMA_VERSION {
            return Err(KernelError::SchemaVersion {
                expected: SCHEMA_VERSION,
                got: vector.schema_version,
            });
        }

        let expected_seq = self.last_sequence + 1;
        if vector.sequence != expected_seq {
            return Err(KernelError::Sequence {
                expected: expected_seq,
                got: vector.sequence,
            });
        }

        let result = evaluate(&vector.operation, self.config.shift_policy)?;

        if let Some(expected) = vector.expected {
            if expected != result {
                return Err(KernelError::ExpectationMismatch {
                    sequence: vector.sequence,
                    expected,
                    got: result,
                });
            }
        }

        Ok(Outcome {
            sequence: vector.sequence,
            op: vector.operation.op,
            lhs: vector.operation.lhs,
            rhs: vector.operation.rhs,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> KernelConfig {
        KernelConfig::with_policy(ShiftPolicy::Strict)
    }

    #[test]
    fn test_evaluate_dispatch() {
        let cases = [
            (BitOp::ShiftLeft, 1, 4, 16),
            (BitOp::ShiftRight, -8, 1, -4),
            (BitOp::UnsignedShiftRight, -8, 1, 2147483644),
            (BitOp::Xor, 5, 3, 6),
        ];
        for (op, lhs, rhs, want) in cases {
            let got = evaluate(&Operation::new(op, lhs, rhs), ShiftPolicy::Mask).unwrap();
            assert_eq!(got, want, "{} {} {}", op, lhs, rhs);
        }
    }

    #[test]
    fn test_mask_policy_accepts_any_count() {
        let op = Operation::new(BitOp::ShiftLeft, 1, 36);
        assert_eq!(evaluate(&op, ShiftPolicy::Mask), Ok(16));
    }

    #[test]
    fn test_strict_policy_rejects_out_of_range() {
        for rhs in [-1, 32, i32::MIN, i32::MAX] {
            let op = Operation::new(BitOp::ShiftRight, -8, rhs);
            assert_eq!(
                evaluate(&op, ShiftPolicy::Strict),
                Err(KernelError::ShiftOutOfRange {
                    op: "shift_right".to_string(),
                    positions: rhs,
                })
            );
        }
        let edge = Operation::new(BitOp::ShiftLeft, 1, 31);
        assert_eq!(evaluate(&edge, ShiftPolicy::Strict), Ok(i32::MIN));
    }

    #[test]
    fn test_strict_policy_ignores_xor_operand() {
        let op = Operation::new(BitOp::Xor, 5, -100);
        assert_eq!(evaluate(&op, ShiftPolicy::Strict), Ok(5 ^ -100));
    }

    #[test]
    fn test_apply_records_outcomes() {
        let mut engine = BitEngine::new(KernelConfig::default());
        let outcome = *engine
            .apply(&TestVector::new(1, BitOp::ShiftLeft, 1, 4).expecting(16))
            .unwrap();
        assert_eq!(outcome.result, 16);
        engine
            .apply(&TestVector::new(2, BitOp::Xor, 5, 3))
            .unwrap();
        assert_eq!(engine.last_sequence(), 2);
        assert_eq!(engine.outcomes().len(), 2);
        assert_eq!(engine.outcomes()[1].result, 6);
    }

    #[test]
    fn test_apply_rejects_sequence_gap() {
        let mut engine = BitEngine::new(KernelConfig::default());
        let err = engine
            .apply(&TestVector::new(2, BitOp::Xor, 1, 1))
            .unwrap_err();
        assert_eq!(err, KernelError::Sequence { expected: 1, got: 2 });
        assert_eq!(engine.last_sequence(), 0);
        assert!(engine.outcomes().is_empty());
    }

    #[test]
    fn test_apply_rejects_schema_version() {
        let mut engine = BitEngine::new(KernelConfig::default());
        let mut vector = TestVector::new(1, BitOp::Xor, 1, 1);
        vector.schema_version = 2;
        assert_eq!(
            engine.apply(&vector).unwrap_err(),
            KernelError::SchemaVersion { expected: 1, got: 2 }
        );
    }

    #[test]
    fn test_apply_expectation_mismatch_leaves_state() {
        let mut engine = BitEngine::new(KernelConfig::default());
        engine.apply(&TestVector::new(1, BitOp::Xor, 5, 3)).unwrap();
        let err = engine
            .apply(&TestVector::new(2, BitOp::ShiftLeft, 1, 4).expecting(15))
            .unwrap_err();
        assert_eq!(
            err,
            KernelError::ExpectationMismatch { sequence: 2, expected: 15, got: 16 }
        );
        assert_eq!(engine.last_sequence(), 1);
        assert_eq!(engine.outcomes().len(), 1);
    }

    #[test]
    fn test_strict_engine_rejects_without_advancing() {
        let mut engine = BitEngine::new(strict());
        let err = engine
            .apply(&TestVector::new(1, BitOp::ShiftLeft, 1, 40))
            .unwrap_err();
        assert!(matches!(err, KernelError::ShiftOutOfRange { positions: 40, .. }));
        engine.apply(&TestVector::new(1, BitOp::ShiftLeft, 1, 8)).unwrap();
        assert_eq!(engine.outcomes()[0].result, 256);
    }

    #[test]
    fn test_apply_all_stops_at_first_failure() {
        let mut engine = BitEngine::new(KernelConfig::default());
        let vectors = vec![
            TestVector::new(1, BitOp::Xor, 1, 2),
            TestVector::new(3, BitOp::Xor, 1, 2),
            TestVector::new(4, BitOp::Xor, 1, 2),
        ];
        assert!(engine.apply_all(&vectors).is_err());
        assert_eq!(engine.outcomes().len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut engine = BitEngine::new(KernelConfig::default());
        engine.apply(&TestVector::new(1, BitOp::Xor, 1, 2)).unwrap();
        engine.reset();
        assert_eq!(engine.last_sequence(), 0);
        assert!(engine.outcomes().is_empty());
        engine.apply(&TestVector::new(1, BitOp::Xor, 1, 2)).unwrap();
    }

    #[test]
    fn test_rollback_to() {
        let mut engine = BitEngine::new(KernelConfig::default());
        for seq in 1..=3 {
            engine.apply(&TestVector::new(seq, BitOp::ShiftLeft, 1, seq as i32)).unwrap();
        }
        engine.rollback_to(1);
        assert_eq!(engine.last_sequence(), 1);
        assert_eq!(engine.outcomes().len(), 1);
        engine.apply(&TestVector::new(2, BitOp::Xor, 0, 0)).unwrap();
    }

    #[test]
    fn test_from_outcomes() {
        let mut source = BitEngine::new(KernelConfig::default());
        source.apply(&TestVector::new(1, BitOp::Xor, 5, 3)).unwrap();
        source.apply(&TestVector::new(2, BitOp::ShiftLeft, 1, 4)).unwrap();

        let mut restored =
            BitEngine::from_outcomes(KernelConfig::default(), source.outcomes().to_vec()).unwrap();
        assert_eq!(restored.last_sequence(), 2);
        restored.apply(&TestVector::new(3, BitOp::Xor, 1, 1)).unwrap();

        let mut gap = source.outcomes().to_vec();
        gap.remove(0);
        assert_eq!(
            BitEngine::from_outcomes(KernelConfig::default(), gap).unwrap_err(),
            KernelError::Sequence { expected: 1, got: 2 }
        );
    }
}
