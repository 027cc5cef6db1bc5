// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shelling out to run a `cmd`/`sh` job or a module's script, bounded by a
//! per-job timeout so one stuck child can't wedge the wheel.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Fallback bound applied when a job or module carries no explicit timeout.
pub const SHELL_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs `cmd`, killing it if it outlives `timeout`. Returns the process
/// output on any exit, success or failure — callers decide what a nonzero
/// status means for their job type.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
) -> Result<Output, String> {
    cmd.kill_on_drop(true);
    let child = cmd.output();
    match tokio::time::timeout(timeout, child).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => Err(format!("spawn failed: {err}")),
        Err(_) => Err(format!("timed out after {timeout:?}")),
    }
}

/// Runs a shell command line (`sh -c <line>`) under [`run_with_timeout`].
/// This is what both `JobType::Cmd`/`JobType::File` execution and
/// [`crate::module_source::ScriptModuleRunner`] build on.
pub struct CmdRunner {
    pub line: String,
    pub timeout: Duration,
}

impl CmdRunner {
    pub fn new(line: impl Into<String>, timeout: Duration) -> Self {
        Self {
            line: line.into(),
            timeout,
        }
    }

    pub async fn run(&self) -> Result<Vec<u8>, String> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.line);
        let output = run_with_timeout(cmd, self.timeout).await?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            let code = output.status.code();
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("exit {code:?}: {stderr}"))
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
