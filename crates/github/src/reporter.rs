//! GitHub Actions workflow commands.
//!
//! Info messages are plain stdout lines; other levels use `::command::data`
//! lines that the runner picks up from stdout.

use gong_action_core::Reporter;
use std::io::Write;
use std::sync::Mutex;

/// Escape command data the way the Actions toolkit does.
#[must_use]
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// [`Reporter`] writing workflow commands to a sink (stdout by default).
pub struct GitHubActionsReporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Default for GitHubActionsReporter {
    fn default() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl std::fmt::Debug for GitHubActionsReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubActionsReporter").finish_non_exhaustive()
    }
}

impl GitHubActionsReporter {
    /// Reporter writing to `out`.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Ask the runner to redact `secret` from all later log output.
    pub fn mask(&self, secret: &str) {
        if !secret.is_empty() {
            self.command("add-mask", secret);
        }
    }

    fn command(&self, name: &str, message: &str) {
        self.line(&format!("::{name}::{}", escape_data(message)));
    }

    fn line(&self, line: &str) {
        // A closed stdout leaves nothing to report to.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }
}

impl Reporter for GitHubActionsReporter {
    fn info(&self, message: &str) {
        self.line(message.trim_end_matches('\n'));
    }

    fn warning(&self, message: &str) {
        self.command("warning", message);
    }

    fn debug(&self, message: &str) {
        self.command("debug", message);
    }

    fn fail(&self, message: &str) {
        self.command("error", message);
    }
}
