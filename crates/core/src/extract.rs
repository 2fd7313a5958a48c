//! Archive extraction.
//!
//! Release artifacts are gzip-compressed tarballs. Entries are unpacked one by
//! one with `unpack_in`, which refuses paths escaping the destination.
//! Symbolic and hard links are rejected outright.

use flate2::read::GzDecoder;
use std::fs::File;
use std::path::Path;
use tar::Archive;
use thiserror::Error;
use tracing::{debug, trace};

/// Extraction failure.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// Archive path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// An entry could not be read or written.
    #[error("invalid archive {path}: {message}")]
    Corrupt {
        /// Archive path.
        path: String,
        /// Underlying message.
        message: String,
    },

    /// An entry would have been written outside the destination.
    #[error("entry '{entry}' escapes the extraction directory")]
    UnsafePath {
        /// Entry path inside the archive.
        entry: String,
    },

    /// The archive holds a symbolic or hard link.
    #[error("entry '{entry}' is a link")]
    LinkEntry {
        /// Entry path inside the archive.
        entry: String,
    },
}

/// Unpacks a downloaded artifact into a directory.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract every entry of `archive` under `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError>;
}

/// Extractor for `.tar.gz` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
        let archive_name = archive.display().to_string();
        debug!(archive = %archive_name, dest = %dest.display(), "Extracting archive");

        let corrupt = |e: std::io::Error| ExtractError::Corrupt {
            path: archive_name.clone(),
            message: e.to_string(),
        };

        let file = File::open(archive).map_err(|source| ExtractError::Open {
            path: archive_name.clone(),
            source,
        })?;
        let mut tar = Archive::new(GzDecoder::new(file));

        for entry in tar.entries().map_err(corrupt)? {
            let mut entry = entry.map_err(corrupt)?;
            let entry_path = entry.path().map_err(corrupt)?.display().to_string();
            trace!(entry = %entry_path, "Unpacking entry");

            // A link target is not checked by unpack_in and can point anywhere.
            let kind = entry.header().entry_type();
            if kind.is_symlink() || kind.is_hard_link() {
                return Err(ExtractError::LinkEntry { entry: entry_path });
            }

            if !entry.unpack_in(dest).map_err(corrupt)? {
                return Err(ExtractError::UnsafePath { entry: entry_path });
            }
        }

        Ok(())
    }
}
