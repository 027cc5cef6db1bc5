// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A durable, ordered key-value store backed by an append-only JSONL log,
//! replayed into an in-memory `BTreeMap` on open. Stands in for the real
//! embedded KV store, treated as an external collaborator.

use crate::error::StoreError;
use crate::kv::KvStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum LogRecord {
    Put { key: String, value: String },
    Delete { key: String },
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(s: &str, offset: u64) -> Result<Vec<u8>, StoreError> {
    if s.len() % 2 != 0 {
        return Err(StoreError::Corrupt {
            offset,
            message: "odd-length hex string".to_string(),
        });
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| StoreError::Corrupt {
                offset,
                message: "invalid hex digit".to_string(),
            })
        })
        .collect()
}

struct Inner {
    map: BTreeMap<Vec<u8>, Vec<u8>>,
    file: Option<File>,
}

impl Inner {
    fn append(&mut self, record: LogRecord) -> Result<(), StoreError> {
        if let Some(file) = self.file.as_mut() {
            let line = serde_json::to_string(&record)?;
            writeln!(file, "{line}")?;
            file.flush()?;
        }
        Ok(())
    }
}

/// Append-log-backed [`KvStore`]. Every mutation is written to the log
/// before the in-memory map is updated, so a crash mid-write leaves the log
/// (and thus the replayed state) consistent with the last fully-written
/// line.
pub struct LogKvStore {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
}

impl LogKvStore {
    /// Open (or create) a durable store backed by the log file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut map = BTreeMap::new();

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (offset, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: LogRecord = serde_json::from_str(&line).map_err(|e| {
                    StoreError::Corrupt {
                        offset: offset as u64,
                        message: e.to_string(),
                    }
                })?;
                match record {
                    LogRecord::Put { key, value } => {
                        map.insert(hex_decode(&key, offset as u64)?, hex_decode(&value, offset as u64)?);
                    }
                    LogRecord::Delete { key } => {
                        map.remove(&hex_decode(&key, offset as u64)?);
                    }
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                map,
                file: Some(file),
            }),
            path: Some(path.to_path_buf()),
        })
    }

    /// A store with no backing file — useful for unit tests that don't
    /// care about restart durability.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: BTreeMap::new(),
                file: None,
            }),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of live keys, for diagnostics/tests.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for LogKvStore {
    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.inner.lock().map.contains_key(key))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.lock().map.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.append(LogRecord::Put {
            key: hex_encode(key),
            value: hex_encode(value),
        })?;
        inner.map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.append(LogRecord::Delete {
            key: hex_encode(key),
        })?;
        inner.map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_store_tests.rs"]
mod tests;
