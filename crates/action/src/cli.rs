//! Step inputs.
//!
//! The runner passes `with:` inputs as `INPUT_<NAME>` environment variables;
//! every input can also be given as a flag for local runs.

use clap::Parser;
use gong_action_core::artifact::DEFAULT_RELEASES_HOST;
use gong_action_core::{
    ActionInputs, ArtifactLayout, FetchPolicy, Platform, RunContext, VersionSpecifier,
};
use gong_action_github::{DEFAULT_API_URL, parse_repository};
use std::path::PathBuf;
use std::time::Duration;

use crate::tracing::{LogLevel, TracingConfig, TracingFormat};

/// Install the gong CLI, cache it and run it with the given arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "gong-action")]
#[command(about = "Install the gong CLI, cache it and run it with the given arguments")]
pub struct Cli {
    /// Version to install: `latest`, `x.y.z` or `vx.y.z`.
    #[arg(long, env = "INPUT_VERSION", default_value = "latest")]
    pub version: String,

    /// Arguments passed to gong, split on whitespace.
    #[arg(long, env = "INPUT_ARGS", default_value = "", allow_hyphen_values = true)]
    pub args: String,

    /// Token used for GitHub API calls.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root of the tool cache.
    #[arg(long, env = "RUNNER_TOOL_CACHE", value_name = "PATH")]
    pub tool_cache: Option<PathBuf>,

    /// Repository publishing the releases.
    #[arg(long, default_value = "Djiit/gong", value_name = "OWNER/REPO")]
    pub repository: String,

    /// Name of the executable inside the release archive.
    #[arg(long, default_value = "gong")]
    pub tool: String,

    /// Host serving release downloads.
    #[arg(long, default_value = DEFAULT_RELEASES_HOST, value_name = "URL")]
    pub releases_host: String,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, value_name = "URL")]
    pub api_url: String,

    /// Per-attempt deadline for network calls, in seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,

    /// Retries after a transient network failure.
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Logging verbosity level.
    #[arg(long, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Diagnostic log format (stderr).
    #[arg(long, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,
}

impl Cli {
    /// Step inputs.
    #[must_use]
    pub fn inputs(&self) -> ActionInputs {
        ActionInputs {
            version: VersionSpecifier::parse(&self.version),
            args: self.args.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
        }
    }

    /// Artifact layout for the configured repository and tool.
    ///
    /// # Errors
    ///
    /// Fails when `repository` is not `owner/repo`.
    pub fn layout(&self) -> gong_action_github::Result<ArtifactLayout> {
        let (owner, repo) = parse_repository(&self.repository)?;
        Ok(ArtifactLayout::new(owner, repo, &self.tool).with_releases_host(&self.releases_host))
    }

    /// Network policy.
    #[must_use]
    pub fn policy(&self) -> FetchPolicy {
        FetchPolicy::default()
            .with_attempts(self.retries.saturating_add(1))
            .with_deadline(self.deadline())
    }

    /// Per-attempt deadline.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Tracing setup.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: self.log_format,
            level: self.log_level.into(),
            filter: None,
        }
    }

    /// Build the immutable run context.
    ///
    /// # Errors
    ///
    /// Fails when `repository` is not `owner/repo`.
    pub fn context(&self, platform: Platform) -> gong_action_github::Result<RunContext> {
        Ok(RunContext::new(self.inputs(), platform)
            .with_layout(self.layout()?)
            .with_policy(self.policy()))
    }
}
