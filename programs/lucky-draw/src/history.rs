//! Append-only draw history.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anchor_lang::prelude::*;

use crate::errors::RaffleError;
use crate::state::DrawRecord;

/// Durable record of completed draws.
///
/// `list_recent` returns the latest `n` records oldest first, so the most
/// recent draw is always last.
pub trait HistorySink: Send + Sync {
    fn append(&self, record: &DrawRecord) -> Result<()>;

    fn list_recent(&self, n: usize) -> Result<Vec<DrawRecord>>;

    /// Highest sequence number stored, used to continue numbering.
    fn last_sequence(&self) -> Result<Option<u64>>;
}

fn tail(records: &[DrawRecord], n: usize) -> Vec<DrawRecord> {
    records[records.len().saturating_sub(n)..].to_vec()
}

/// History kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<DrawRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistorySink for MemoryHistory {
    fn append(&self, record: &DrawRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        records.push(record.clone());
        Ok(())
    }

    fn list_recent(&self, n: usize) -> Result<Vec<DrawRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        Ok(tail(&records, n))
    }

    fn last_sequence(&self) -> Result<Option<u64>> {
        let records = self
            .records
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        Ok(records.last().map(|r| r.sequence))
    }
}

/// History stored as one JSON document per line.
///
/// Lines are only ever appended. Existing lines are read back on open so
/// sequence numbers keep increasing across restarts; the file doubles as the
/// export handed to operators. A line torn by a crash mid-append is closed off
/// on open so later records start on a fresh line, and its sequence number is
/// still counted as used when it can be read.
#[derive(Debug)]
pub struct JsonlHistory {
    path: PathBuf,
    records: Mutex<Vec<DrawRecord>>,
    last_sequence: Mutex<Option<u64>>,
}

impl JsonlHistory {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let loaded = if path.exists() {
            read_records(&path)?
        } else {
            Loaded::default()
        };

        if loaded.torn_tail {
            tracing::warn!(path = %path.display(), "closing torn last history line");
            append_bytes(&path, b"\n")?;
        }

        tracing::debug!(
            path = %path.display(),
            records = loaded.records.len(),
            last_sequence = ?loaded.last_sequence,
            "opened draw history"
        );

        Ok(Self {
            path,
            records: Mutex::new(loaded.records),
            last_sequence: Mutex::new(loaded.last_sequence),
        })
    }

    pub fn export_path(&self) -> &Path {
        &self.path
    }
}

#[derive(Default)]
struct Loaded {
    records: Vec<DrawRecord>,
    last_sequence: Option<u64>,
    torn_tail: bool,
}

fn read_records(path: &Path) -> Result<Loaded> {
    let bytes = std::fs::read(path).map_err(|error| {
        tracing::error!(path = %path.display(), %error, "cannot read draw history");
        error!(RaffleError::HistorySinkFailure)
    })?;

    let mut loaded = Loaded {
        torn_tail: bytes.last().is_some_and(|b| *b != b'\n'),
        ..Loaded::default()
    };
    for (number, line) in bytes.split(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<DrawRecord>(line) {
            Ok(record) => {
                loaded.last_sequence = loaded.last_sequence.max(Some(record.sequence));
                loaded.records.push(record);
            }
            Err(error) => {
                let salvaged = salvage_sequence(line);
                tracing::warn!(
                    line = number + 1,
                    %error,
                    sequence = ?salvaged,
                    "skipping unreadable history line"
                );
                loaded.last_sequence = loaded.last_sequence.max(salvaged);
            }
        }
    }
    Ok(loaded)
}

/// Records are written with `sequence` as their first field, so a truncated
/// line still carries its number.
fn salvage_sequence(line: &[u8]) -> Option<u64> {
    let rest = line.strip_prefix(br#"{"sequence":"#)?;
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || rest.get(digits) != Some(&b',') {
        return None;
    }
    std::str::from_utf8(&rest[..digits]).ok()?.parse().ok()
}

fn append_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| {
            tracing::error!(path = %path.display(), %error, "cannot open draw history");
            error!(RaffleError::HistorySinkFailure)
        })?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|error| {
            tracing::error!(path = %path.display(), %error, "cannot append draw history");
            error!(RaffleError::HistorySinkFailure)
        })
}

impl HistorySink for JsonlHistory {
    fn append(&self, record: &DrawRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;

        let mut line =
            serde_json::to_string(record).map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        line.push('\n');

        append_bytes(&self.path, line.as_bytes())?;

        let mut last = self
            .last_sequence
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        *last = (*last).max(Some(record.sequence));
        records.push(record.clone());
        Ok(())
    }

    fn list_recent(&self, n: usize) -> Result<Vec<DrawRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        Ok(tail(&records, n))
    }

    fn last_sequence(&self) -> Result<Option<u64>> {
        let last = self
            .last_sequence
            .lock()
            .map_err(|_| error!(RaffleError::HistorySinkFailure))?;
        Ok(*last)
    }
}
