//! Immutable per-run configuration.

use crate::artifact::ArtifactLayout;
use crate::fetch::FetchPolicy;
use crate::platform::Platform;
use crate::version::VersionSpecifier;

/// Inputs supplied by the workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    /// Requested version.
    pub version: VersionSpecifier,
    /// Whitespace-separated arguments forwarded to the tool.
    pub args: String,
    /// Token for the release API, if any.
    pub token: Option<String>,
}

impl Default for ActionInputs {
    fn default() -> Self {
        Self {
            version: VersionSpecifier::Latest,
            args: String::new(),
            token: None,
        }
    }
}

/// Everything a run needs, built once at entry and passed by reference.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Step inputs.
    pub inputs: ActionInputs,
    /// Detected host platform.
    pub platform: Platform,
    /// Release artifact naming.
    pub layout: ArtifactLayout,
    /// Retry and deadline policy for network calls.
    pub policy: FetchPolicy,
}

impl RunContext {
    /// Context with default layout and policy.
    #[must_use]
    pub fn new(inputs: ActionInputs, platform: Platform) -> Self {
        Self {
            inputs,
            platform,
            layout: ArtifactLayout::default(),
            policy: FetchPolicy::default(),
        }
    }

    /// Replace the artifact layout.
    #[must_use]
    pub fn with_layout(mut self, layout: ArtifactLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the fetch policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }
}
