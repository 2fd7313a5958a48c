//! Release hosting collaborators: latest-release lookup and artifact download.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::fetch::FetchError;

/// Release metadata as returned by the release hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseMetadata {
    /// Release tag name (e.g., "v1.2.3").
    pub tag_name: String,
    /// Downloadable assets.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseAsset {
    /// Asset filename.
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
}

/// Looks up the latest published release of a fixed repository.
#[async_trait]
pub trait ReleaseLookup: Send + Sync {
    /// `owner/repo` identity, used in messages.
    fn repository(&self) -> String;

    /// Fetch the latest release.
    ///
    /// Implementations must report "no releases" as [`FetchError::NotFound`].
    async fn latest_release(&self) -> Result<ReleaseMetadata, FetchError>;
}

/// Downloads a release artifact to a local file.
#[async_trait]
pub trait ArtifactDownloader: Send + Sync {
    /// Download `url` into `dest`, creating or truncating the file.
    ///
    /// Implementations must report a missing artifact as
    /// [`FetchError::NotFound`].
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}
