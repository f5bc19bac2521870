#![forbid(unsafe_code)]

/// Kernel v1 — Immutable. Behavioral changes require kernel_v2.
pub const KERNEL_VERSION: u32 = 1;

pub mod bits;
pub mod error;
pub mod domain;
pub mod vectors;
pub mod engine;
pub mod properties;
pub mod hashing;
pub mod logging;

pub use bits::{shift_left, shift_right, unsigned_shift_right, xor};
pub use error::KernelError;
