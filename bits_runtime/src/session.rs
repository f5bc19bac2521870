//! Session manager — isolated sessions with persist-after-apply semantics.
//!
//! Each session gets its own directory with an operation log and snapshots.
//! Concurrency: Mutex for write serialization, no global mutable state.
//!
//! Apply-before-persist order:
//!   1. engine.apply(vector)   — may be rejected by the kernel
//!   2. op_store.append()      — only if step 1 succeeded; rolled back on failure
//!   3. snapshot if interval reached — best effort, the vector is already committed

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use bits_kernel::domain::{KernelConfig, Outcome};
use bits_kernel::engine::BitEngine;
use bits_kernel::hashing::canonical_hash;
use bits_kernel::vectors::TestVector;

use crate::error::RuntimeError;
use crate::op_store::OpStore;
use crate::proto_bridge::{kernel_to_proto, proto_to_kernel};
use crate::replay;
use crate::snapshot;

/// An isolated session with its own operation log and outcomes.
pub struct Session {
    session_id: String,
    session_dir: PathBuf,
    engine: BitEngine,
    op_store: OpStore,
    snapshot_interval: u64,
    resumed_from: u64,
}

impl Session {
    /// Open (or create) a session in the given base directory.
    ///
    /// Directory structure:
    ///   <base_dir>/<session_id>/ops.log
    ///   <base_dir>/<session_id>/snapshots/
    ///
    /// Existing logs are replayed. A valid snapshot with the same shift
    /// policy is used as the starting point; otherwise the full log is replayed.
    pub fn open(
        base_dir: &Path,
        session_id: &str,
        snapshot_interval: u64,
        config: KernelConfig,
    ) -> Result<Self, RuntimeError> {
        let session_dir = base_dir.join(session_id);
        let op_store = OpStore::open(&session_dir.join("ops.log"))?;

        let vectors = load_vectors(&op_store)?;
        let mut engine = Self::start_from_snapshot(&session_dir, config, op_store.last_sequence())
            .unwrap_or_else(|| BitEngine::new(config));
        let resume_after = engine.last_sequence();
        for vector in vectors.iter().filter(|v| v.sequence > resume_after) {
            engine.apply(vector)?;
        }

        info!(
            session_id,
            sequence = engine.last_sequence(),
            resumed_from = resume_after,
            "opened session"
        );

        Ok(Self {
            session_id: session_id.to_string(),
            session_dir,
            engine,
            op_store,
            snapshot_interval,
            resumed_from: resume_after,
        })
    }

    fn start_from_snapshot(session_dir: &Path, config: KernelConfig, last_logged: u64) -> Option<BitEngine> {
        let snap = match snapshot::load_latest_snapshot(&session_dir.join("snapshots")) {
            Ok(Some(snap)) => snap,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "unreadable snapshot, replaying full log");
                return None;
            }
        };
        if snap.shift_policy != config.shift_policy || snap.sequence > last_logged {
            return None;
        }
        match snapshot::restore_snapshot(&snap) {
            Ok((cfg, outcomes)) => BitEngine::from_outcomes(cfg, outcomes).ok(),
            Err(e) => {
                warn!(sequence = snap.sequence, error = %e, "invalid snapshot, replaying full log");
                None
            }
        }
    }

    /// Apply a single vector: evaluate via kernel, then persist.
    ///
    /// Nothing is persisted if the kernel rejects the vector. If the log
    /// write fails the outcome is rolled back. Once the log write succeeds
    /// the vector is committed and `Ok` is returned even if the interval
    /// snapshot cannot be written; the next open then replays the log.
    pub fn apply(&mut self, vector: &TestVector) -> Result<Outcome, RuntimeError> {
        let outcome = *self.engine.apply(vector)?;

        if let Err(e) = self.op_store.append(&kernel_to_proto(vector)) {
            self.engine.rollback_to(outcome.sequence - 1);
            return Err(e);
        }

        if self.snapshot_interval > 0 && outcome.sequence % self.snapshot_interval == 0 {
            if let Err(e) = snapshot::save_snapshot(
                &self.session_dir.join("snapshots"),
                outcome.sequence,
                self.engine.config(),
                self.engine.outcomes(),
            ) {
                warn!(
                    session_id = %self.session_id,
                    sequence = outcome.sequence,
                    error = %e,
                    "snapshot skipped"
                );
            }
        }

        Ok(outcome)
    }

    /// Full replay from the log — rebuild the engine from scratch.
    pub fn replay_full(&mut self) -> Result<(Vec<Outcome>, String), RuntimeError> {
        let vectors = load_vectors(&self.op_store)?;
        let config = self.engine.config();
        let (outcomes, hash) = replay::rebuild_outcomes(&vectors, config)?;
        self.engine = BitEngine::from_outcomes(config, outcomes.clone())?;
        Ok((outcomes, hash))
    }

    pub fn outcomes(&self) -> &[Outcome] {
        self.engine.outcomes()
    }

    pub fn current_hash(&self) -> String {
        canonical_hash(self.engine.config().shift_policy, self.engine.outcomes())
    }

    pub fn current_sequence(&self) -> u64 {
        self.engine.last_sequence()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Sequence of the snapshot this session was opened from, 0 after a full replay.
    pub fn resumed_from(&self) -> u64 {
        self.resumed_from
    }
}

fn load_vectors(store: &OpStore) -> Result<Vec<TestVector>, RuntimeError> {
    store.load_all()?.iter().map(proto_to_kernel).collect()
}

/// Thread-safe session handle using Mutex.
pub struct SharedSession {
    inner: Mutex<Session>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Apply a vector under lock.
    pub fn apply(&self, vector: &TestVector) -> Result<Outcome, RuntimeError> {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.apply(vector)
    }

    pub fn current_hash(&self) -> String {
        let session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.current_hash()
    }

    pub fn current_sequence(&self) -> u64 {
        let session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.current_sequence()
    }
}
