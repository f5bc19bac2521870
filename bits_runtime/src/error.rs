use std::io;

use thiserror::Error;

use bits_kernel::KernelError;

/// All runtime failures. Kernel rejections pass through unchanged.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("IoError: {0}")]
    Io(#[from] io::Error),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Frame header or body unusable: bad length or cut short.
    #[error("Corrupt operation log at byte {offset}: {reason}")]
    CorruptFrame { offset: u64, reason: String },

    /// Log sequences must run 1, 2, 3, ... on disk and on append.
    #[error("Log sequence error: expected {expected}, got {got}")]
    LogSequence { expected: u64, got: u64 },

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wire record carries no usable operation tag.
    #[error("Invalid operation tag {0} at sequence {1}")]
    InvalidOperation(i32, u64),

    #[error("Snapshot integrity failure: {0}")]
    Snapshot(String),

    #[error("Determinism failure: run 1 = {0}, run 2 = {1}")]
    Determinism(String, String),
}
