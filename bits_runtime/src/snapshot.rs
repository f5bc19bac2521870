//! Snapshot layer — deterministic outcome snapshots.
//!
//! A snapshot stores the outcomes up to a sequence together with their
//! canonical hash. No timestamps in snapshot content.
//!
//! - `save_snapshot` / `load_snapshot` / `load_latest_snapshot`: file I/O
//! - `verify_snapshot_hash`: recompute the canonical hash
//! - `restore_snapshot`: hash + version + per-outcome re-evaluation

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bits_kernel::domain::{KernelConfig, Outcome, ShiftPolicy};
use bits_kernel::hashing::canonical_hash;
use bits_kernel::properties::try_verify_outcome;
use bits_kernel::KERNEL_VERSION;

use crate::error::RuntimeError;

/// Snapshot on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Sequence number at which this snapshot was taken.
    pub sequence: u64,
    pub shift_policy: ShiftPolicy,
    pub outcomes: Vec<Outcome>,
    /// Canonical hash of (shift_policy, outcomes).
    pub hash: String,
    pub kernel_version: u32,
}

impl Snapshot {
    pub fn new(sequence: u64, config: KernelConfig, outcomes: &[Outcome]) -> Self {
        Self {
            sequence,
            shift_policy: config.shift_policy,
            outcomes: outcomes.to_vec(),
            hash: canonical_hash(config.shift_policy, outcomes),
            kernel_version: KERNEL_VERSION,
        }
    }
}

fn snapshot_path(dir: &Path, sequence: u64) -> PathBuf {
    dir.join(format!("snapshot_{:06}.json", sequence))
}

/// Save a deterministic snapshot of the given outcomes.
pub fn save_snapshot(
    dir: &Path,
    sequence: u64,
    config: KernelConfig,
    outcomes: &[Outcome],
) -> Result<PathBuf, RuntimeError> {
    fs::create_dir_all(dir)?;

    let snap = Snapshot::new(sequence, config, outcomes);
    let content = serde_json::to_string(&snap)?;

    let path = snapshot_path(dir, sequence);
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    info!(path = %path.display(), sequence, hash = %snap.hash, "saved snapshot");
    Ok(path)
}

/// Load the snapshot at a specific sequence number, if present.
pub fn load_snapshot(dir: &Path, sequence: u64) -> Result<Option<Snapshot>, RuntimeError> {
    let path = snapshot_path(dir, sequence);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let snap: Snapshot = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "loaded snapshot");
    Ok(Some(snap))
}

/// Load the snapshot with the highest sequence in a directory.
pub fn load_latest_snapshot(dir: &Path) -> Result<Option<Snapshot>, RuntimeError> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut best_seq: Option<u64> = None;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let seq = name
            .to_string_lossy()
            .strip_prefix("snapshot_")
            .and_then(|s| s.strip_suffix(".json"))
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(seq) = seq {
            best_seq = Some(best_seq.map_or(seq, |best| best.max(seq)));
        }
    }

    match best_seq {
        Some(seq) => load_snapshot(dir, seq),
        None => Ok(None),
    }
}

/// True if the stored hash matches the snapshot's content.
pub fn verify_snapshot_hash(snap: &Snapshot) -> bool {
    canonical_hash(snap.shift_policy, &snap.outcomes) == snap.hash
}

/// Validate a snapshot and return its configuration and outcomes.
///
/// Rejects: a different kernel version, a stale hash, outcome sequences
/// other than exactly 1..=sequence, and any outcome whose recorded result
/// does not re-evaluate.
pub fn restore_snapshot(snap: &Snapshot) -> Result<(KernelConfig, Vec<Outcome>), RuntimeError> {
    if snap.kernel_version != KERNEL_VERSION {
        return Err(RuntimeError::Snapshot(format!(
            "kernel version {} does not match {}",
            snap.kernel_version, KERNEL_VERSION
        )));
    }
    if !verify_snapshot_hash(snap) {
        return Err(RuntimeError::Snapshot(format!(
            "hash mismatch at sequence {}",
            snap.sequence
        )));
    }
    if snap.outcomes.len() as u64 != snap.sequence
        || snap.outcomes.iter().zip(1u64..).any(|(o, seq)| o.sequence != seq)
    {
        return Err(RuntimeError::Snapshot(format!(
            "outcomes are not numbered 1..={}",
            snap.sequence
        )));
    }
    for outcome in &snap.outcomes {
        try_verify_outcome(outcome, snap.shift_policy)?;
    }

    Ok((
        KernelConfig::with_policy(snap.shift_policy),
        snap.outcomes.clone(),
    ))
}
