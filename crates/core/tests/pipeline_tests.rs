//! End-to-end pipeline tests with in-memory network fakes

mod common;

use common::{
    CountingCache, CountingExtractor, ECHO_SCRIPT, FakeDownloader, FakeLookup, HangingLookup,
    tarball,
};
use gong_action_core::pipeline::{self, Collaborators};
use gong_action_core::{
    ActionInputs, Arch, Error, FetchError, FetchPolicy, Level, Os, Platform, RecordingReporter,
    ReleaseLookupError, RunContext, VersionSpecifier,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Harness {
    temp: TempDir,
    lookup: Arc<FakeLookup>,
    downloader: Arc<FakeDownloader>,
    extractor: Arc<CountingExtractor>,
    cache: Arc<CountingCache>,
    reporter: Arc<RecordingReporter>,
}

impl Harness {
    fn new(lookup: FakeLookup, downloader: FakeDownloader) -> Self {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(CountingCache::new(&temp.path().join("tool-cache")));
        Self {
            temp,
            lookup: Arc::new(lookup),
            downloader: Arc::new(downloader),
            extractor: Arc::new(CountingExtractor::default()),
            cache,
            reporter: Arc::new(RecordingReporter::new()),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            lookup: self.lookup.clone(),
            downloader: self.downloader.clone(),
            extractor: self.extractor.clone(),
            cache: self.cache.clone(),
            reporter: self.reporter.clone(),
        }
    }
}

fn context(version: &str, args: &str) -> RunContext {
    RunContext::new(
        ActionInputs {
            version: VersionSpecifier::parse(version),
            args: args.to_string(),
            token: None,
        },
        Platform::new(Os::Linux, Arch::Amd64),
    )
    .with_policy(
        FetchPolicy::default()
            .with_initial_backoff(Duration::from_millis(1))
            .with_deadline(Duration::from_secs(10)),
    )
}

fn script_archive() -> FakeDownloader {
    FakeDownloader::serving(tarball(&[("gong", ECHO_SCRIPT, 0o755)]))
}

#[cfg(unix)]
#[tokio::test]
async fn test_latest_end_to_end() {
    let h = Harness::new(FakeLookup::tag("v0.5.0"), script_archive());

    let result = pipeline::run(&context("latest", "notify  --channel ci"), &h.collaborators())
        .await
        .unwrap();

    assert_eq!(result.stdout, "args: notify --channel ci\n");
    assert_eq!(h.lookup.calls(), 1);
    assert_eq!(
        h.downloader.urls(),
        vec!["https://github.com/Djiit/gong/releases/download/v0.5.0/gong_0.5.0_linux_amd64.tar.gz"]
    );

    let info = h.reporter.at(Level::Info);
    assert_eq!(info[0], "Latest version is 0.5.0");
    assert!(info.contains(&"Running gong notify --channel ci".to_string()));
    assert_eq!(info.last().unwrap(), "args: notify --channel ci\n");
    assert_eq!(h.reporter.at(Level::Warning), vec!["heads up\n"]);
    assert_eq!(
        h.reporter.at(Level::Debug),
        vec!["gong execution completed"]
    );
    assert!(h.reporter.at(Level::Failure).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_explicit_version_never_calls_lookup() {
    let h = Harness::new(
        FakeLookup::failing(FetchError::transport("must not be called")),
        script_archive(),
    );

    pipeline::run(&context("v1.2.3", ""), &h.collaborators())
        .await
        .unwrap();

    assert_eq!(h.lookup.calls(), 0);
    assert_eq!(
        h.downloader.urls(),
        vec!["https://github.com/Djiit/gong/releases/download/v1.2.3/gong_1.2.3_linux_amd64.tar.gz"]
    );
    assert!(
        !h.reporter
            .at(Level::Info)
            .iter()
            .any(|m| m.starts_with("Latest version"))
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_second_run_hits_cache() {
    let h = Harness::new(FakeLookup::tag("v1.0.0"), script_archive());
    let ctx = context("1.0.0", "");

    pipeline::run(&ctx, &h.collaborators()).await.unwrap();
    pipeline::run(&ctx, &h.collaborators()).await.unwrap();

    assert_eq!(h.downloader.urls().len(), 1);
    assert_eq!(h.extractor.calls(), 1);
    assert_eq!(h.cache.puts(), 1);
    assert!(
        h.reporter
            .at(Level::Info)
            .contains(&"gong 1.0.0 found in cache".to_string())
    );
    assert!(h.temp.path().join("tool-cache/gong/1.0.0/amd64.complete").is_file());
}

#[tokio::test]
async fn test_invalid_version_fails_before_any_io() {
    let h = Harness::new(FakeLookup::tag("v1.0.0"), script_archive());

    let ok = pipeline::run_and_report(&context("1.2", ""), &h.collaborators()).await;

    assert!(!ok);
    assert_eq!(
        h.reporter.at(Level::Failure),
        vec!["Invalid version format: 1.2. Please use a valid semver format (x.y.z) or 'latest'."]
    );
    assert_eq!(h.lookup.calls(), 0);
    assert!(h.downloader.urls().is_empty());
}

#[tokio::test]
async fn test_no_releases_stops_before_download() {
    let h = Harness::new(
        FakeLookup::failing(FetchError::NotFound { url: "u".into() }),
        script_archive(),
    );

    let err = pipeline::run(&context("latest", ""), &h.collaborators())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::ReleaseLookupFailed(ReleaseLookupError::NoReleases { .. })
    ));
    assert_eq!(h.lookup.calls(), 1);
    assert!(h.downloader.urls().is_empty());
}

#[tokio::test]
async fn test_lookup_server_error_is_other() {
    let h = Harness::new(
        FakeLookup::failing(FetchError::Status {
            url: "u".into(),
            status: 502,
        }),
        script_archive(),
    );

    let err = pipeline::run(&context("latest", ""), &h.collaborators())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::ReleaseLookupFailed(ReleaseLookupError::Other { .. })
    ));
    assert!(err.to_string().starts_with("Failed to fetch latest release: "));
    assert_eq!(h.lookup.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_lookup_deadline_is_other() {
    let h = Harness::new(FakeLookup::tag("unused"), script_archive());
    let collaborators = Collaborators {
        lookup: Arc::new(HangingLookup {
            delay: Duration::from_secs(60),
        }),
        ..h.collaborators()
    };
    let ctx = context("latest", "")
        .with_policy(FetchPolicy::single_attempt(Duration::from_millis(50)));

    let err = pipeline::run(&ctx, &collaborators).await.unwrap_err();

    assert!(matches!(
        err,
        Error::ReleaseLookupFailed(ReleaseLookupError::Other { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Failed to fetch latest release: request timed out after 50ms"
    );
    assert!(h.downloader.urls().is_empty());
}

#[tokio::test]
async fn test_failure_is_reported_once() {
    let h = Harness::new(
        FakeLookup::tag("v1.0.0"),
        FakeDownloader::failing(FetchError::NotFound { url: "u".into() }),
    );

    let ok = pipeline::run_and_report(&context("2.0.0", ""), &h.collaborators()).await;

    assert!(!ok);
    assert_eq!(
        h.reporter.at(Level::Failure),
        vec!["Version 2.0.0 not found. Please check if this version exists in the Djiit/gong releases."]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_nonzero_exit_fails_run() {
    let h = Harness::new(
        FakeLookup::tag("v1.0.0"),
        FakeDownloader::serving(tarball(&[(
            "gong",
            b"#!/bin/sh\necho 'missing webhook' >&2\nexit 2\n",
            0o755,
        )])),
    );

    let ok = pipeline::run_and_report(&context("1.0.0", "send"), &h.collaborators()).await;

    assert!(!ok);
    let failures = h.reporter.at(Level::Failure);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("missing webhook"), "{}", failures[0]);
    assert!(h.reporter.at(Level::Debug).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_explicit_version_with_help_flag() {
    let h = Harness::new(FakeLookup::tag("v9.0.0"), script_archive());

    let ok = pipeline::run_and_report(&context("2.0.0", "--help"), &h.collaborators()).await;

    assert!(ok);
    assert!(
        h.reporter
            .at(Level::Info)
            .contains(&"args: --help\n".to_string())
    );
    assert!(h.reporter.at(Level::Failure).is_empty());
    assert_eq!(h.extractor.calls(), 1);
    assert_eq!(h.cache.puts(), 1);
}
