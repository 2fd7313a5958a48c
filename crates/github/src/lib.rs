//! GitHub implementations of the gong-action collaborators.
//!
//! - [`GitHubReleases`] looks up the latest release through the REST API and
//!   downloads release artifacts
//! - [`GitHubActionsReporter`] writes workflow commands to stdout

#![warn(missing_docs)]

mod error;
mod releases;
mod reporter;

pub use error::{Error, Result};
pub use releases::{DEFAULT_API_URL, GitHubReleases, parse_repository};
pub use reporter::{GitHubActionsReporter, escape_data};
