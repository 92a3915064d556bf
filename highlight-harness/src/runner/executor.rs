//! Subprocess execution and outcome classification

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::config::{HarnessPaths, ToolConfig};

/// Configuration for the executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Program to invoke
    pub program: String,
    /// Per-invocation timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ToolConfig::default().into()
    }
}

impl From<ToolConfig> for ExecutorConfig {
    fn from(tool: ToolConfig) -> Self {
        Self {
            program: tool.program,
            timeout_ms: tool.timeout_ms,
        }
    }
}

/// Classification of a single invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Exit status zero
    Pass,
    /// The tool ran and rejected its input with a non-zero exit
    CaughtError { code: i32 },
    /// No usable result: launch failure, timeout or abnormal termination
    CrashFail { reason: String },
}

impl Outcome {
    pub fn is_crash(&self) -> bool {
        matches!(self, Outcome::CrashFail { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::CaughtError { code } => write!(f, "CAUGHT_ERROR (Code {})", code),
            Outcome::CrashFail { reason } => write!(f, "CRASH_FAIL - {}", reason),
        }
    }
}

/// Result of one invocation, with captured output for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub stderr: String,
    pub latency_ms: u64,
}

impl InvocationResult {
    fn crash(reason: impl Into<String>, started: Instant) -> Self {
        Self {
            outcome: Outcome::CrashFail { reason: reason.into() },
            stdout: String::new(),
            stderr: String::new(),
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Runs the tool under test, one invocation at a time
#[derive(Debug, Clone)]
pub struct Executor {
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    /// Run the tool with `args` and classify the result.
    ///
    /// The child is killed if it outlives the timeout.
    pub async fn execute(&self, args: &[String]) -> InvocationResult {
        let started = Instant::now();
        let timeout = Duration::from_millis(self.config.timeout_ms);

        let child = Command::new(&self.config.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                return InvocationResult::crash(
                    format!("failed to launch {}: {}", self.config.program, e),
                    started,
                );
            }
        };

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return InvocationResult::crash(format!("failed to wait for tool: {}", e), started);
            }
            Err(_) => {
                tracing::warn!(
                    "{} exceeded {}ms timeout, killed",
                    self.config.program,
                    self.config.timeout_ms
                );
                return InvocationResult::crash(
                    format!("timed out after {}ms", self.config.timeout_ms),
                    started,
                );
            }
        };

        let outcome = match output.status.code() {
            Some(0) => Outcome::Pass,
            Some(code) => Outcome::CaughtError { code },
            None => Outcome::CrashFail {
                reason: format!("terminated without exit code ({})", output.status),
            },
        };

        InvocationResult {
            outcome,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Remove the fixture and output files if present.
    ///
    /// Failures are logged and never abort the run.
    pub fn cleanup(paths: &HarnessPaths) {
        remove_if_present(&paths.fixture);
        remove_if_present(&paths.output);
    }
}

fn remove_if_present(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Cleanup of {} failed: {}", path.display(), e),
    }
}
