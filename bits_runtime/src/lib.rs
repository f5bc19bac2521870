#![forbid(unsafe_code)]

//! Bits Runtime
//!
//! Wraps the bits kernel with an operation log, replay,
//! snapshots, session management, and drift detection.
//!
//! No bit logic lives here — all evaluation is delegated
//! to the kernel.

pub mod error;
pub mod proto_types;
pub mod proto_bridge;
pub mod op_store;
pub mod replay;
pub mod snapshot;
pub mod session;
pub mod drift;

pub use error::RuntimeError;
