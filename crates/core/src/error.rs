//! Error types for the resolution, acquisition and invocation pipeline.
//!
//! Every variant is fatal to the run. The `Display` text of an error is
//! exactly the message reported through the host's failure channel.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that terminate a run.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The requested version is neither `latest` nor a strict `x.y.z`.
    #[error("Invalid version format: {input}. Please use a valid semver format (x.y.z) or 'latest'.")]
    #[diagnostic(
        code(gong_action::version::invalid_format),
        help("Examples of accepted values: latest, 1.2.3, v1.2.3")
    )]
    InvalidVersionFormat {
        /// The input exactly as the user supplied it.
        input: String,
    },

    /// The latest release could not be determined.
    #[error(transparent)]
    #[diagnostic(transparent)]
    ReleaseLookupFailed(#[from] ReleaseLookupError),

    /// The release artifact for the resolved version does not exist.
    #[error(
        "Version {version} not found. Please check if this version exists in the {repository} releases."
    )]
    #[diagnostic(code(gong_action::acquire::version_not_found))]
    VersionNotFound {
        /// The resolved version.
        version: String,
        /// `owner/repo` the artifact was requested from.
        repository: String,
    },

    /// The artifact download failed for a reason other than not-found.
    #[error("Failed to download {tool}: {message}")]
    #[diagnostic(code(gong_action::acquire::download_failed))]
    DownloadFailed {
        /// Tool being downloaded.
        tool: String,
        /// Artifact URL.
        url: String,
        /// Underlying transport message.
        message: String,
    },

    /// The downloaded archive could not be unpacked.
    #[error("Failed to extract archive: {message}")]
    #[diagnostic(code(gong_action::acquire::extraction_failed))]
    ExtractionFailed {
        /// Underlying archive error.
        message: String,
    },

    /// The host OS or architecture is outside the supported set.
    #[error("Unsupported {what}: {value}")]
    #[diagnostic(
        code(gong_action::platform::unsupported),
        help("Supported targets are darwin, linux and windows on amd64, arm64 and 386")
    )]
    UnsupportedPlatform {
        /// `"platform"` or `"architecture"`.
        what: &'static str,
        /// The value reported by the host.
        value: String,
    },

    /// The wrapped binary could not be started or exited non-zero.
    #[error("Failed to run {program}: {message}")]
    #[diagnostic(code(gong_action::invoke::execution_failed))]
    ExecutionFailed {
        /// Program path.
        program: String,
        /// Exit status and captured stderr, or the spawn error.
        message: String,
    },

    /// The tool cache could not store an entry.
    #[error("Tool cache error at {}: {message}", path.display())]
    #[diagnostic(code(gong_action::cache::write_failed))]
    Cache {
        /// Cache path being written.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    #[diagnostic(code(gong_action::io))]
    Io(#[from] std::io::Error),
}

/// Failure kinds of the latest-release lookup.
#[derive(Error, Debug, Diagnostic)]
pub enum ReleaseLookupError {
    /// The repository has no published releases (or does not exist).
    #[error(
        "No releases found for {repository}. Make sure the repository exists and has published releases."
    )]
    #[diagnostic(code(gong_action::release::no_releases))]
    NoReleases {
        /// `owner/repo` that was queried.
        repository: String,
    },

    /// Any other transport or API failure.
    #[error("Failed to fetch latest release: {message}")]
    #[diagnostic(code(gong_action::release::lookup_failed))]
    Other {
        /// Underlying message.
        message: String,
    },
}

impl Error {
    /// Create an invalid version format error.
    #[must_use]
    pub fn invalid_version_format(input: impl Into<String>) -> Self {
        Self::InvalidVersionFormat {
            input: input.into(),
        }
    }

    /// Create a "no releases" lookup error.
    #[must_use]
    pub fn no_releases(repository: impl Into<String>) -> Self {
        Self::ReleaseLookupFailed(ReleaseLookupError::NoReleases {
            repository: repository.into(),
        })
    }

    /// Create a generic lookup error.
    #[must_use]
    pub fn release_lookup(message: impl Into<String>) -> Self {
        Self::ReleaseLookupFailed(ReleaseLookupError::Other {
            message: message.into(),
        })
    }

    /// Create a version not found error.
    #[must_use]
    pub fn version_not_found(version: impl Into<String>, repository: impl Into<String>) -> Self {
        Self::VersionNotFound {
            version: version.into(),
            repository: repository.into(),
        }
    }

    /// Create a download failed error.
    #[must_use]
    pub fn download_failed(
        tool: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DownloadFailed {
            tool: tool.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction failed error.
    #[must_use]
    pub fn extraction_failed(message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
        }
    }

    /// Create an unsupported operating system error.
    #[must_use]
    pub fn unsupported_os(value: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            what: "platform",
            value: value.into(),
        }
    }

    /// Create an unsupported architecture error.
    #[must_use]
    pub fn unsupported_arch(value: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            what: "architecture",
            value: value.into(),
        }
    }

    /// Create an execution failed error.
    #[must_use]
    pub fn execution_failed(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create a cache write error.
    #[must_use]
    pub fn cache(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Cache {
            path: path.into(),
            message: message.into(),
        }
    }
}
