//! Persistent tool cache keyed by (name, version, architecture).
//!
//! Entries follow the runner tool-cache layout so that binaries cached by
//! other steps on the same runner are reused:
//!
//! ```text
//! <root>/
//! └── gong/
//!     └── 1.2.3/
//!         ├── amd64/
//!         │   └── gong
//!         └── amd64.complete
//! ```
//!
//! An entry is only visible once its `.complete` marker exists.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::platform::Arch;
use crate::{Error, Result};

/// Environment variable naming the runner's tool cache root.
pub const TOOL_CACHE_ENV: &str = "RUNNER_TOOL_CACHE";

const MARKER_SUFFIX: &str = "complete";

/// Lookup and insertion of cached tool directories.
pub trait ToolCache: Send + Sync {
    /// Directory of a complete entry, if present.
    fn find(&self, name: &str, version: &str, arch: Arch) -> Option<PathBuf>;

    /// Store `source` as `file_name` in the entry for (name, version, arch)
    /// and return the entry directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cache`] when the entry cannot be written.
    fn put(
        &self,
        source: &Path,
        name: &str,
        file_name: &str,
        version: &str,
        arch: Arch,
    ) -> Result<PathBuf>;
}

/// Cache root used when none is configured: `RUNNER_TOOL_CACHE`, else the
/// user cache directory.
#[must_use]
pub fn default_root() -> PathBuf {
    match std::env::var_os(TOOL_CACHE_ENV) {
        Some(root) if !root.is_empty() => PathBuf::from(root),
        _ => dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("gong-action")
            .join("tools"),
    }
}

/// Filesystem-backed [`ToolCache`].
#[derive(Debug, Clone)]
pub struct DirToolCache {
    root: PathBuf,
}

impl Default for DirToolCache {
    fn default() -> Self {
        Self::new(default_root())
    }
}

impl DirToolCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every architecture of one version.
    #[must_use]
    pub fn version_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version)
    }

    /// Entry directory for (name, version, arch).
    #[must_use]
    pub fn entry_dir(&self, name: &str, version: &str, arch: Arch) -> PathBuf {
        self.version_dir(name, version).join(arch.as_str())
    }

    /// Marker file whose presence makes the entry visible.
    #[must_use]
    pub fn marker_path(&self, name: &str, version: &str, arch: Arch) -> PathBuf {
        self.version_dir(name, version)
            .join(format!("{}.{MARKER_SUFFIX}", arch.as_str()))
    }
}

impl ToolCache for DirToolCache {
    fn find(&self, name: &str, version: &str, arch: Arch) -> Option<PathBuf> {
        let entry = self.entry_dir(name, version, arch);
        if self.marker_path(name, version, arch).is_file() && entry.is_dir() {
            trace!(name, version, %arch, path = %entry.display(), "Tool cache hit");
            Some(entry)
        } else {
            trace!(name, version, %arch, "Tool cache miss");
            None
        }
    }

    fn put(
        &self,
        source: &Path,
        name: &str,
        file_name: &str,
        version: &str,
        arch: Arch,
    ) -> Result<PathBuf> {
        let version_dir = self.version_dir(name, version);
        let entry = self.entry_dir(name, version, arch);
        let marker = self.marker_path(name, version, arch);
        let cache_err = |path: &Path, e: std::io::Error| Error::cache(path, e.to_string());

        std::fs::create_dir_all(&version_dir).map_err(|e| cache_err(&version_dir, e))?;

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&version_dir)
            .map_err(|e| cache_err(&version_dir, e))?;
        let staged_file = staging.path().join(file_name);
        // fs::copy carries the permission bits over.
        std::fs::copy(source, &staged_file).map_err(|e| cache_err(&staged_file, e))?;

        if marker.exists() {
            std::fs::remove_file(&marker).map_err(|e| cache_err(&marker, e))?;
        }
        if entry.exists() {
            std::fs::remove_dir_all(&entry).map_err(|e| cache_err(&entry, e))?;
        }

        let staged_dir = staging.keep();
        if let Err(e) = std::fs::rename(&staged_dir, &entry) {
            let _ = std::fs::remove_dir_all(&staged_dir);
            return Err(cache_err(&entry, e));
        }
        std::fs::write(&marker, b"").map_err(|e| cache_err(&marker, e))?;

        debug!(name, version, %arch, path = %entry.display(), "Stored tool in cache");
        Ok(entry)
    }
}
