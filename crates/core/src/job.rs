// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and the `Job` record itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 64-bit job identifier, big-endian encoded when persisted so
/// lexicographic key order equals numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// The three ways a job's `extra` payload can be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// `extra` is a literal shell command.
    Cmd,
    /// `extra` is a script body, persisted to `<script_dir>/<uuid>.sh`.
    #[serde(rename = "sh")]
    File,
    /// `extra` is a `name@version` module id.
    Plugin,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::Cmd => write!(f, "cmd"),
            JobType::File => write!(f, "sh"),
            JobType::Plugin => write!(f, "plugin"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cmd" => Ok(JobType::Cmd),
            "sh" => Ok(JobType::File),
            "plugin" => Ok(JobType::Plugin),
            _ => Err(crate::error::Error::InvalidParameter),
        }
    }
}

/// A delayed task. `uuid` is assigned by the manager and immutable once set;
/// `retry` and `interval` are coerced to a minimum of 1 on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub uuid: JobId,
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub retry: u32,
    pub interval: u64,
    pub add_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_time: Option<i64>,
    #[serde(with = "hex_bytes")]
    pub extra: Vec<u8>,
}

impl Job {
    /// Construct a new job. `uuid` and `add_time` are filled in by the
    /// caller (the manager) once persistence succeeds; this constructor
    /// only normalizes `retry`/`interval` to a minimum of 1.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uuid: JobId,
        name: impl Into<String>,
        job_type: JobType,
        retry: u32,
        interval: u64,
        add_time: i64,
        limit_time: Option<i64>,
        extra: Vec<u8>,
    ) -> Self {
        Self {
            uuid,
            name: name.into(),
            job_type,
            retry: retry.max(1),
            interval: interval.max(1),
            add_time,
            limit_time,
            extra,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id:{},name:{},type:{},interval:{},retry:{},add_time:{}",
            self.uuid, self.name, self.job_type, self.interval, self.retry, self.add_time
        )
    }
}

/// Serializes `Vec<u8>` as a `0x`-prefixed hex string, matching the
/// original's `hexutil.Bytes` JSON encoding of `Job.extra`.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = String::with_capacity(2 + bytes.len() * 2);
        out.push_str("0x");
        for b in bytes {
            out.push_str(&format!("{:02x}", b));
        }
        serializer.serialize_str(&out)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(Vec::new());
        }
        (0..s.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(s.get(i..i + 2).unwrap_or(""), 16)
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
