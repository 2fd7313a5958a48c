//! Version specifier parsing and resolution.
//!
//! A specifier is either `latest`, resolved through the release lookup, or an
//! explicit `x.y.z` (optionally `v`-prefixed), validated locally.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::fetch::{FetchError, FetchPolicy};
use crate::release::ReleaseLookup;
use crate::{Error, Result};

/// Keyword requesting the most recent published release.
pub const LATEST: &str = "latest";

#[allow(clippy::expect_used)]
static STRICT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern, compilation cannot fail.
    Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)$").expect("valid version pattern")
});

/// Strip a single leading `v`.
#[must_use]
pub fn sanitize(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Whether `version` is a strict `MAJOR.MINOR.PATCH` with no leading zeros,
/// prefix or suffix.
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    STRICT_VERSION.is_match(version)
}

/// User-supplied version request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpecifier {
    /// Most recent published release.
    Latest,
    /// Explicit version text, exactly as supplied.
    Explicit(String),
}

impl VersionSpecifier {
    /// Parse a raw input. An empty input takes the `latest` default.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == LATEST {
            Self::Latest
        } else {
            Self::Explicit(trimmed.to_string())
        }
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Explicit(version) => f.write_str(version),
        }
    }
}

/// A normalized version without the `v` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Validate an explicit version after stripping an optional `v`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersionFormat`] naming `input` when the
    /// sanitized text is not a strict `x.y.z`.
    pub fn parse(input: &str) -> Result<Self> {
        let sanitized = sanitize(input);
        if is_valid_version(sanitized) {
            Ok(Self(sanitized.to_string()))
        } else {
            Err(Error::invalid_version_format(input))
        }
    }

    /// Build from a release tag. Tags are trusted as emitted by the release
    /// system and are not validated.
    #[must_use]
    pub fn from_release_tag(tag: &str) -> Self {
        Self(sanitize(tag).to_string())
    }

    /// The version text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turn a specifier into a concrete version.
///
/// `lookup` is only consulted for [`VersionSpecifier::Latest`].
#[instrument(skip(lookup, policy), fields(specifier = %specifier))]
pub async fn resolve(
    specifier: &VersionSpecifier,
    lookup: &dyn ReleaseLookup,
    policy: &FetchPolicy,
) -> Result<ResolvedVersion> {
    match specifier {
        VersionSpecifier::Explicit(input) => ResolvedVersion::parse(input),
        VersionSpecifier::Latest => {
            let release = policy
                .run("latest release lookup", || lookup.latest_release())
                .await
                .map_err(|err| match err {
                    FetchError::NotFound { .. } => Error::no_releases(lookup.repository()),
                    other => Error::release_lookup(other.to_string()),
                })?;

            debug!(tag = %release.tag_name, "Resolved latest release");
            Ok(ResolvedVersion::from_release_tag(&release.tag_name))
        }
    }
}
