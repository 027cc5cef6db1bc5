// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs one due job to completion and produces its [`JobResult`].

use crate::registry::ModuleRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tw_adapters::{run_with_timeout, CmdRunner, SHELL_COMMAND_TIMEOUT};
use tw_core::{Clock, Job, JobResult, JobType, NoopRecorder, Recorder};

/// Executes `Cmd`/`File` jobs via a subprocess and `Plugin` jobs via the
/// module registry. `script_dir` is where a `File` job's body is persisted
/// before it runs, matching the original's `<script_dir>/<uuid>.sh` layout.
pub struct Executor {
    registry: Arc<ModuleRegistry>,
    clock: Arc<dyn Clock>,
    script_dir: PathBuf,
    recorder: Arc<dyn Recorder>,
}

impl Executor {
    pub fn new(registry: Arc<ModuleRegistry>, clock: Arc<dyn Clock>, script_dir: PathBuf) -> Self {
        Self::with_recorder(registry, clock, script_dir, Arc::new(NoopRecorder))
    }

    pub fn with_recorder(
        registry: Arc<ModuleRegistry>,
        clock: Arc<dyn Clock>,
        script_dir: PathBuf,
        recorder: Arc<dyn Recorder>,
    ) -> Self {
        Self {
            registry,
            clock,
            script_dir,
            recorder,
        }
    }

    pub async fn execute(&self, job: &Job) -> JobResult {
        let begin_time = self.clock.now_unix();
        let outcome = self.run(job).await;
        let end_time = self.clock.now_unix();
        self.recorder.record(
            job.job_type,
            outcome.is_ok(),
            (end_time - begin_time).max(0) as f64,
        );
        match outcome {
            Ok(extra) => JobResult::success(job.uuid, begin_time, end_time, extra),
            Err(error_msg) => JobResult::failure(job.uuid, begin_time, end_time, error_msg),
        }
    }

    async fn run(&self, job: &Job) -> Result<Vec<u8>, String> {
        let timeout = self.timeout_for(job);
        match job.job_type {
            JobType::Cmd => {
                let line = String::from_utf8_lossy(&job.extra).into_owned();
                let attempts = job.retry.max(1);
                let mut last_err = String::new();
                for attempt in 0..attempts {
                    match CmdRunner::new(line.clone(), timeout).run().await {
                        Ok(out) => return Ok(out),
                        Err(err) => {
                            tracing::warn!(job = %job.uuid, attempt, error = %err, "cmd job attempt failed");
                            last_err = err;
                        }
                    }
                }
                Err(last_err)
            }
            JobType::File => self.run_file(job, timeout).await,
            JobType::Plugin => {
                let module_id = String::from_utf8_lossy(&job.extra).trim().to_string();
                match self.registry.get(&module_id) {
                    Some(module) => {
                        match tokio::time::timeout(timeout, module.execute_with_retry(job.retry)).await {
                            Ok(result) => result,
                            Err(_) => Err(format!("timed out after {timeout:?}")),
                        }
                    }
                    None => Err(format!("unknown module {module_id}")),
                }
            }
        }
    }

    /// The bound applied to this job's execution: time remaining until
    /// `job.limit_time` if set, else the flat default.
    fn timeout_for(&self, job: &Job) -> Duration {
        match job.limit_time {
            Some(limit) => {
                let remaining = (limit - self.clock.now_unix()).max(0) as u64;
                Duration::from_secs(remaining)
            }
            None => SHELL_COMMAND_TIMEOUT,
        }
    }

    async fn run_file(&self, job: &Job, timeout: Duration) -> Result<Vec<u8>, String> {
        let path = self.script_dir.join(format!("{}.sh", job.uuid));
        tokio::fs::write(&path, &job.extra)
            .await
            .map_err(|err| format!("failed to persist script {}: {err}", path.display()))?;

        let attempts = job.retry.max(1);
        let mut last_err = String::new();
        for attempt in 0..attempts {
            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg(&path);
            let outcome = run_with_timeout(cmd, timeout).await.and_then(|output| {
                if output.status.success() {
                    Ok(output.stdout)
                } else {
                    Err(format!(
                        "exit {:?}: {}",
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr)
                    ))
                }
            });
            match outcome {
                Ok(out) => return Ok(out),
                Err(err) => {
                    tracing::warn!(job = %job.uuid, attempt, error = %err, "file job attempt failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
