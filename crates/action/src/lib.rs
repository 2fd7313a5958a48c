//! GitHub Actions step installing and running the gong CLI.

#![warn(missing_docs)]

pub mod cli;
pub mod tracing;

use gong_action_core::pipeline::{self, Collaborators};
use gong_action_core::{DirToolCache, Platform, Reporter, TarGzExtractor};
use gong_action_github::{GitHubActionsReporter, GitHubReleases};
use miette::IntoDiagnostic;
use std::sync::Arc;

pub use cli::Cli;

/// Wire the collaborators for `cli` and run the step.
///
/// Every failure, setup included, is reported once through the workflow
/// error channel. Returns whether the run succeeded.
pub async fn run(cli: &Cli, reporter: Arc<GitHubActionsReporter>) -> bool {
    if let Some(token) = cli.token.as_deref() {
        reporter.mask(token);
    }

    let setup = || -> miette::Result<_> {
        let platform = Platform::detect()?;
        let ctx = cli.context(platform).into_diagnostic()?;
        let releases = Arc::new(
            GitHubReleases::new(&cli.repository, cli.deadline())
                .into_diagnostic()?
                .with_api_url(&cli.api_url)
                .with_token(ctx.inputs.token.clone()),
        );
        let cache = cli
            .tool_cache
            .as_ref()
            .map_or_else(DirToolCache::default, DirToolCache::new);
        let collaborators = Collaborators {
            lookup: releases.clone(),
            downloader: releases,
            extractor: Arc::new(TarGzExtractor),
            cache: Arc::new(cache),
            reporter: reporter.clone(),
        };
        Ok((ctx, collaborators))
    };

    match setup() {
        Ok((ctx, collaborators)) => pipeline::run_and_report(&ctx, &collaborators).await,
        Err(report) => {
            ::tracing::error!(error = ?report, "Setup failed");
            reporter.fail(&report.to_string());
            false
        }
    }
}
