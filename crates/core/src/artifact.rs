//! Release artifact naming.
//!
//! The archive suffix is configuration: artifacts are published under a fixed
//! architecture suffix that does not follow the host architecture used for
//! cache keys.

use crate::platform::Os;
use crate::version::ResolvedVersion;

/// Default host serving release downloads.
pub const DEFAULT_RELEASES_HOST: &str = "https://github.com";

/// Where and under which names release artifacts are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    /// Base URL of the releases host, without trailing slash.
    pub releases_host: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Executable name inside the archive; also the cache tool name.
    pub tool: String,
    /// Architecture suffix used in artifact file names.
    pub arch_suffix: String,
    /// Archive extension, without leading dot.
    pub extension: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            releases_host: DEFAULT_RELEASES_HOST.to_string(),
            owner: "Djiit".to_string(),
            repo: "gong".to_string(),
            tool: "gong".to_string(),
            arch_suffix: "amd64".to_string(),
            extension: "tar.gz".to_string(),
        }
    }
}

impl ArtifactLayout {
    /// Layout for `owner/repo` publishing `tool`, with default naming.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            tool: tool.into(),
            ..Self::default()
        }
    }

    /// Override the releases host.
    #[must_use]
    pub fn with_releases_host(mut self, host: impl Into<String>) -> Self {
        self.releases_host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the architecture suffix.
    #[must_use]
    pub fn with_arch_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.arch_suffix = suffix.into();
        self
    }

    /// `owner/repo`.
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Artifact file name, e.g. `gong_1.2.3_linux_amd64.tar.gz`.
    #[must_use]
    pub fn file_name(&self, version: &ResolvedVersion, os: Os) -> String {
        format!(
            "{}_{}_{}_{}.{}",
            self.tool, version, os, self.arch_suffix, self.extension
        )
    }

    /// Download URL of the artifact for `version` on `os`.
    #[must_use]
    pub fn download_url(&self, version: &ResolvedVersion, os: Os) -> String {
        format!(
            "{}/{}/{}/releases/download/v{}/{}",
            self.releases_host,
            self.owner,
            self.repo,
            version,
            self.file_name(version, os)
        )
    }
}
