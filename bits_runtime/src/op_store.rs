//! Operation log — one protobuf frame per applied vector.
//!
//! File layout: `[u32 LE body length][ProtoOperation body]` repeated.
//! The frame at index i carries sequence i + 1; this is checked both when
//! appending and when the file is read back. An append either lands a whole
//! frame (synced to disk) or leaves the file at its previous length.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use prost::Message;
use tracing::{debug, warn};

use crate::error::RuntimeError;
use crate::proto_types::ProtoOperation;

const FRAME_HEADER_LEN: usize = 4;
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

pub struct OpStore {
    path: PathBuf,
    last_sequence: u64,
}

impl OpStore {
    /// Open the log at `path`, creating parent directories as needed.
    /// An existing file is fully decoded and checked before use.
    pub fn open(path: &Path) -> Result<Self, RuntimeError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let last_sequence = match read_log(path)? {
            Some(ops) => ops.len() as u64,
            None => 0,
        };
        debug!(path = %path.display(), last_sequence, "opened operation log");

        Ok(Self {
            path: path.to_path_buf(),
            last_sequence,
        })
    }

    /// Append the record for `last_sequence + 1`.
    pub fn append(&mut self, op: &ProtoOperation) -> Result<(), RuntimeError> {
        let expected = self.last_sequence + 1;
        if op.sequence != expected {
            return Err(RuntimeError::LogSequence {
                expected,
                got: op.sequence,
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let start = file.metadata()?.len();
        write_frame(&mut file, start, &encode_frame(op))?;

        self.last_sequence = op.sequence;
        Ok(())
    }

    pub fn load_all(&self) -> Result<Vec<ProtoOperation>, RuntimeError> {
        Ok(read_log(&self.path)?.unwrap_or_default())
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `None` when no log file exists yet.
fn read_log(path: &Path) -> Result<Option<Vec<ProtoOperation>>, RuntimeError> {
    match fs::read(path) {
        Ok(bytes) => decode_frames(&bytes).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn encode_frame(op: &ProtoOperation) -> Vec<u8> {
    let body = op.encode_to_vec();
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);
    frame
}

fn decode_frames(bytes: &[u8]) -> Result<Vec<ProtoOperation>, RuntimeError> {
    let mut ops = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + FRAME_HEADER_LEN)
            .ok_or_else(|| corrupt(offset, "torn length header"))?;
        let mut len_buf = [0u8; FRAME_HEADER_LEN];
        len_buf.copy_from_slice(header);
        let len = u32::from_le_bytes(len_buf) as usize;

        // Every record carries sequence >= 1, so a real body is never empty.
        if len == 0 || len > MAX_FRAME_LEN {
            return Err(corrupt(offset, format!("invalid frame length {}", len)));
        }

        let body_start = offset + FRAME_HEADER_LEN;
        let body = bytes
            .get(body_start..body_start + len)
            .ok_or_else(|| corrupt(offset, format!("{}-byte frame cut short", len)))?;
        let op = ProtoOperation::decode(body)?;

        let expected = ops.len() as u64 + 1;
        if op.sequence != expected {
            return Err(RuntimeError::LogSequence {
                expected,
                got: op.sequence,
            });
        }

        ops.push(op);
        offset = body_start + len;
    }

    Ok(ops)
}

fn corrupt(offset: usize, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::CorruptFrame {
        offset: offset as u64,
        reason: reason.into(),
    }
}

/// Destination of an append: a writable file that can be synced and cut back.
trait FrameSink: Write {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl FrameSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_all()
    }
}

/// Write and sync one frame. On failure the sink is cut back to `start`
/// so a torn frame never survives into the next open.
fn write_frame<S: FrameSink>(sink: &mut S, start: u64, frame: &[u8]) -> Result<(), RuntimeError> {
    let written = sink
        .write_all(frame)
        .and_then(|()| sink.flush())
        .and_then(|()| sink.sync());

    if let Err(e) = written {
        warn!(start, error = %e, "append failed, truncating operation log");
        if let Err(cut) = sink.truncate_to(start) {
            warn!(start, error = %cut, "could not truncate operation log");
        }
        return Err(e.into());
    }
    Ok(())
}
