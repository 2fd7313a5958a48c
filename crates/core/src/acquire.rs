//! Cache-aware acquisition of the tool binary.
//!
//! A cache hit returns immediately without touching the network. A miss
//! downloads the release archive, extracts it, marks the binary executable
//! and inserts it into the cache; temporary files live in [`TempDir`]s that
//! are removed when acquisition returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, instrument};

use crate::artifact::ArtifactLayout;
use crate::cache::ToolCache;
use crate::extract::ArchiveExtractor;
use crate::fetch::{FetchError, FetchPolicy};
use crate::platform::Platform;
use crate::release::ArtifactDownloader;
use crate::report::Reporter;
use crate::version::ResolvedVersion;
use crate::{Error, Result};

/// Obtains the tool for a version and platform, from cache or by download.
pub struct ToolAcquirer {
    cache: Arc<dyn ToolCache>,
    downloader: Arc<dyn ArtifactDownloader>,
    extractor: Arc<dyn ArchiveExtractor>,
    layout: ArtifactLayout,
    policy: FetchPolicy,
}

impl ToolAcquirer {
    /// Create an acquirer from its collaborators.
    #[must_use]
    pub fn new(
        cache: Arc<dyn ToolCache>,
        downloader: Arc<dyn ArtifactDownloader>,
        extractor: Arc<dyn ArchiveExtractor>,
        layout: ArtifactLayout,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            cache,
            downloader,
            extractor,
            layout,
            policy,
        }
    }

    /// Return the cache directory holding the tool for `version`, downloading
    /// it on a miss. The executable is `<dir>/<tool>`.
    ///
    /// # Errors
    ///
    /// - [`Error::VersionNotFound`] when the artifact does not exist
    /// - [`Error::DownloadFailed`] for any other download failure
    /// - [`Error::ExtractionFailed`] when the archive is unusable
    /// - [`Error::Cache`] when the entry cannot be stored
    #[instrument(
        skip(self, reporter),
        fields(tool = %self.layout.tool, version = %version, platform = %platform)
    )]
    pub async fn acquire(
        &self,
        version: &ResolvedVersion,
        platform: Platform,
        reporter: &dyn Reporter,
    ) -> Result<PathBuf> {
        let tool = self.layout.tool.as_str();

        if let Some(dir) = self.cache.find(tool, version.as_str(), platform.arch) {
            reporter.info(&format!("{tool} {version} found in cache"));
            debug!(path = %dir.display(), "Using cached tool");
            return Ok(dir);
        }

        reporter.info(&format!(
            "{tool} {version} not found in cache. Downloading..."
        ));

        let url = self.layout.download_url(version, platform.os);
        reporter.info(&format!("Downloading {tool} from {url}"));

        let download_dir = TempDir::new()?;
        let archive = download_dir
            .path()
            .join(self.layout.file_name(version, platform.os));

        self.policy
            .run("artifact download", || self.downloader.download(&url, &archive))
            .await
            .map_err(|err| match err {
                FetchError::NotFound { .. } => {
                    Error::version_not_found(version.as_str(), self.layout.repository())
                }
                other => Error::download_failed(tool, &url, other.to_string()),
            })?;

        let extract_dir = TempDir::new()?;
        self.extract(&archive, extract_dir.path()).await?;

        let binary = extract_dir.path().join(tool);
        let is_regular_file = tokio::fs::symlink_metadata(&binary)
            .await
            .is_ok_and(|meta| meta.file_type().is_file());
        if !is_regular_file {
            return Err(Error::extraction_failed(format!(
                "archive does not contain '{tool}' as a regular file"
            )));
        }
        make_executable(&binary).await?;
        reporter.info(&format!("Downloaded {tool} successfully"));

        let entry = self.store(binary, version, platform).await?;
        reporter.info(&format!("{tool} has been cached at {}", entry.display()));
        info!(path = %entry.display(), "Tool acquired");

        Ok(entry)
    }

    async fn store(
        &self,
        binary: PathBuf,
        version: &ResolvedVersion,
        platform: Platform,
    ) -> Result<PathBuf> {
        let cache = Arc::clone(&self.cache);
        let tool = self.layout.tool.clone();
        let version = version.as_str().to_string();

        tokio::task::spawn_blocking(move || {
            cache.put(&binary, &tool, &tool, &version, platform.arch)
        })
        .await
        .map_err(|e| Error::cache(self.layout.tool.as_str(), e.to_string()))?
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let extractor = Arc::clone(&self.extractor);
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();

        tokio::task::spawn_blocking(move || extractor.extract(&archive, &dest))
            .await
            .map_err(|e| Error::extraction_failed(e.to_string()))?
            .map_err(|e| Error::extraction_failed(e.to_string()))
    }
}

/// Add execute permission for user, group and others.
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// No-op outside Unix.
#[cfg(not(unix))]
pub async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
