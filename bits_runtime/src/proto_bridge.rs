//! Proto ↔ Kernel conversion bridge.
//!
//! Converts between the log's wire records (proto_types.rs) and the
//! kernel's TestVector.

use bits_kernel::domain::{BitOp, Operation};
use bits_kernel::vectors::TestVector;

use crate::error::RuntimeError;
use crate::proto_types::{ProtoBitOp, ProtoOperation};

pub fn op_to_proto(op: BitOp) -> ProtoBitOp {
    match op {
        BitOp::ShiftLeft => ProtoBitOp::ShiftLeft,
        BitOp::ShiftRight => ProtoBitOp::ShiftRight,
        BitOp::UnsignedShiftRight => ProtoBitOp::UnsignedShiftRight,
        BitOp::Xor => ProtoBitOp::Xor,
    }
}

/// Convert a kernel TestVector into its wire record.
pub fn kernel_to_proto(vector: &TestVector) -> ProtoOperation {
    ProtoOperation {
        sequence: vector.sequence,
        op: op_to_proto(vector.operation.op) as i32,
        lhs: vector.operation.lhs,
        rhs: vector.operation.rhs,
        expected: vector.expected,
        schema_version: vector.schema_version,
    }
}

/// Convert a wire record back into a kernel TestVector.
///
/// Fails on `UNSPECIFIED` or on tags this build does not know.
pub fn proto_to_kernel(proto: &ProtoOperation) -> Result<TestVector, RuntimeError> {
    let op = match ProtoBitOp::try_from(proto.op) {
        Ok(ProtoBitOp::ShiftLeft) => BitOp::ShiftLeft,
        Ok(ProtoBitOp::ShiftRight) => BitOp::ShiftRight,
        Ok(ProtoBitOp::UnsignedShiftRight) => BitOp::UnsignedShiftRight,
        Ok(ProtoBitOp::Xor) => BitOp::Xor,
        Ok(ProtoBitOp::Unspecified) | Err(_) => {
            return Err(RuntimeError::InvalidOperation(proto.op, proto.sequence));
        }
    };

    Ok(TestVector {
        sequence: proto.sequence,
        operation: Operation::new(op, proto.lhs, proto.rhs),
        expected: proto.expected,
        schema_version: proto.schema_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_bridge_preserves_vector() {
        for op in BitOp::ALL {
            let vector = TestVector::new(7, op, i32::MIN, -1).expecting(42);
            let proto = kernel_to_proto(&vector);
            let bytes = proto.encode_to_vec();
            let decoded = ProtoOperation::decode(bytes.as_slice()).unwrap();
            assert_eq!(proto_to_kernel(&decoded).unwrap(), vector);
        }
    }

    #[test]
    fn test_missing_expected_stays_missing() {
        let vector = TestVector::new(1, BitOp::Xor, 5, 3);
        let proto = kernel_to_proto(&vector);
        assert_eq!(proto.expected, None);
        assert_eq!(proto_to_kernel(&proto).unwrap().expected, None);
    }

    #[test]
    fn test_unspecified_op_rejected() {
        let mut proto = kernel_to_proto(&TestVector::new(3, BitOp::Xor, 1, 1));
        proto.op = ProtoBitOp::Unspecified as i32;
        assert!(matches!(
            proto_to_kernel(&proto),
            Err(RuntimeError::InvalidOperation(0, 3))
        ));
        proto.op = 99;
        assert!(matches!(
            proto_to_kernel(&proto),
            Err(RuntimeError::InvalidOperation(99, 3))
        ));
    }
}
