//! Running the acquired binary.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::{Error, Result};

/// Captured output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
    /// Process exit code; always 0 for a returned result.
    pub exit_code: i32,
}

/// Split an argument string on whitespace.
///
/// Quoting is not interpreted: `"a b"` yields two arguments.
#[must_use]
pub fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}

/// Runs a binary with arguments and captures its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolInvoker;

impl ToolInvoker {
    /// Run `program` with `args`, buffering stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutionFailed`] when the process cannot be started
    /// or exits with a non-zero status. The message carries the exit code and
    /// the trimmed stderr.
    #[instrument(skip(self))]
    pub async fn invoke(&self, program: &Path, args: &[String]) -> Result<ExecutionResult> {
        let program_name = program.display().to_string();

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::execution_failed(&program_name, e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let detail = stderr.trim();
            let message = if detail.is_empty() {
                format!("exited with status {code}")
            } else {
                format!("exited with status {code}: {detail}")
            };
            return Err(Error::execution_failed(program_name, message));
        }

        debug!(stdout_len = stdout.len(), stderr_len = stderr.len(), "Process finished");
        Ok(ExecutionResult {
            stdout,
            stderr,
            exit_code: output.status.code().unwrap_or_default(),
        })
    }
}
