//! Hand-written protobuf types for the operation log.
//!
//! Uses prost derive macros for encode/decode without prost-build.
//! Field numbers are part of the on-disk format and never change.

use prost::Message;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProtoBitOp {
    Unspecified = 0,
    ShiftLeft = 1,
    ShiftRight = 2,
    UnsignedShiftRight = 3,
    Xor = 4,
}

/// One logged test vector.
#[derive(Clone, PartialEq, Message)]
pub struct ProtoOperation {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(enumeration = "ProtoBitOp", tag = "2")]
    pub op: i32,
    #[prost(sint32, tag = "3")]
    pub lhs: i32,
    #[prost(sint32, tag = "4")]
    pub rhs: i32,
    #[prost(sint32, optional, tag = "5")]
    pub expected: Option<i32>,
    #[prost(uint32, tag = "6")]
    pub schema_version: u32,
}
