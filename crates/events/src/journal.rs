//! Event journal - append-only JSONL storage
//!
//! One JSON-serialized event per line; the file is append-only and never
//! rewritten. The in-memory mode keeps events in a buffer so tests can
//! assert on the emitted stream without touching disk.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::EventResult;
use crate::event::TokenEvent;

enum Backing {
    File { path: PathBuf, file: File },
    Memory(Vec<TokenEvent>),
}

/// Append-only journal of canonical token events.
pub struct EventJournal {
    backing: Backing,
}

impl EventJournal {
    /// Create a file-backed journal at the given path
    pub fn new(path: impl AsRef<Path>) -> EventResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            backing: Backing::File { path, file },
        })
    }

    /// Create an in-memory journal (for testing)
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory(Vec::new()),
        }
    }

    /// Append an event to the journal
    pub fn append(&mut self, event: TokenEvent) -> EventResult<()> {
        match &mut self.backing {
            Backing::File { file, .. } => {
                let json = serde_json::to_string(&event)?;
                writeln!(file, "{}", json)?;
                file.flush()?;
                Ok(())
            }
            Backing::Memory(events) => {
                events.push(event);
                Ok(())
            }
        }
    }

    /// Read all events from the journal
    pub fn read_all(&self) -> EventResult<Vec<TokenEvent>> {
        match &self.backing {
            Backing::File { path, .. } => {
                let file = File::open(path)?;
                let reader = BufReader::new(file);
                let mut events = Vec::new();

                for line in reader.lines() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    events.push(serde_json::from_str(&line)?);
                }

                Ok(events)
            }
            Backing::Memory(events) => Ok(events.clone()),
        }
    }

    /// Read events starting at the given offset (for checkpointed replay)
    pub fn read_from(&self, offset: usize) -> EventResult<Vec<TokenEvent>> {
        Ok(self.read_all()?.into_iter().skip(offset).collect())
    }

    /// Number of recorded events
    pub fn len(&self) -> EventResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Whether the journal is empty
    pub fn is_empty(&self) -> EventResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Path of the journal file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File { path, .. } => Some(path),
            Backing::Memory(_) => None,
        }
    }
}
