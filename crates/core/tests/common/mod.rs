//! Fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use gong_action_core::{
    Arch, ArchiveExtractor, ArtifactDownloader, DirToolCache, ExtractError, FetchError,
    ReleaseLookup, ReleaseMetadata, TarGzExtractor, ToolCache,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shell script printing its arguments on stdout and a note on stderr.
pub const ECHO_SCRIPT: &[u8] = b"#!/bin/sh\necho \"args: $*\"\necho 'heads up' >&2\n";

/// Write a `.tar.gz` holding `files` and return its bytes.
pub fn tarball(files: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, content, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_path(path).unwrap();
        header.set_size(content.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append(&header, &content[..]).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Lookup returning a fixed outcome and counting calls.
pub struct FakeLookup {
    outcome: Result<ReleaseMetadata, FetchError>,
    pub calls: AtomicUsize,
}

impl FakeLookup {
    pub fn tag(tag: &str) -> Self {
        Self {
            outcome: Ok(ReleaseMetadata {
                tag_name: tag.to_string(),
                assets: Vec::new(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            outcome: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseLookup for FakeLookup {
    fn repository(&self) -> String {
        "Djiit/gong".to_string()
    }

    async fn latest_release(&self) -> Result<ReleaseMetadata, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Downloader serving fixed bytes (or a fixed error) and recording URLs.
pub struct FakeDownloader {
    outcome: Result<Vec<u8>, FetchError>,
    pub urls: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn serving(bytes: Vec<u8>) -> Self {
        Self {
            outcome: Ok(bytes),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            outcome: Err(err),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactDownloader for FakeDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.urls.lock().unwrap().push(url.to_string());
        let bytes = self.outcome.clone()?;
        tokio::fs::write(dest, bytes)
            .await
            .map_err(|e| FetchError::transport(e.to_string()))
    }
}

/// Real tar.gz extractor that counts invocations.
#[derive(Default)]
pub struct CountingExtractor {
    pub calls: AtomicUsize,
}

impl CountingExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArchiveExtractor for CountingExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        TarGzExtractor.extract(archive, dest)
    }
}

/// Filesystem cache that counts insertions.
pub struct CountingCache {
    pub inner: DirToolCache,
    pub puts: AtomicUsize,
}

impl CountingCache {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: DirToolCache::new(root),
            puts: AtomicUsize::new(0),
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl ToolCache for CountingCache {
    fn find(&self, name: &str, version: &str, arch: Arch) -> Option<PathBuf> {
        self.inner.find(name, version, arch)
    }

    fn put(
        &self,
        source: &Path,
        name: &str,
        file_name: &str,
        version: &str,
        arch: Arch,
    ) -> gong_action_core::Result<PathBuf> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(source, name, file_name, version, arch)
    }
}

/// Lookup that never answers before `delay`.
pub struct HangingLookup {
    pub delay: Duration,
}

#[async_trait]
impl ReleaseLookup for HangingLookup {
    fn repository(&self) -> String {
        "Djiit/gong".to_string()
    }

    async fn latest_release(&self) -> Result<ReleaseMetadata, FetchError> {
        tokio::time::sleep(self.delay).await;
        Err(FetchError::transport("answered too late"))
    }
}

/// Downloader that never answers before `delay`.
pub struct HangingDownloader {
    pub delay: Duration,
}

#[async_trait]
impl ArtifactDownloader for HangingDownloader {
    async fn download(&self, _url: &str, _dest: &Path) -> Result<(), FetchError> {
        tokio::time::sleep(self.delay).await;
        Err(FetchError::transport("answered too late"))
    }
}

/// Extractor that plants `<dest>/<name>` as a symlink to `target`.
#[cfg(unix)]
pub struct SymlinkExtractor {
    pub name: String,
    pub target: PathBuf,
}

#[cfg(unix)]
impl ArchiveExtractor for SymlinkExtractor {
    fn extract(&self, _archive: &Path, dest: &Path) -> Result<(), ExtractError> {
        std::os::unix::fs::symlink(&self.target, dest.join(&self.name)).map_err(|e| {
            ExtractError::Corrupt {
                path: dest.display().to_string(),
                message: e.to_string(),
            }
        })
    }
}

/// `.tar.gz` whose only entry `name` is a symlink to `target`.
pub fn symlink_tarball(name: &str, target: &Path) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_path(name).unwrap();
    header.set_link_name(target).unwrap();
    header.set_size(0);
    header.set_mode(0o777);
    header.set_cksum();
    builder.append(&header, std::io::empty()).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}
