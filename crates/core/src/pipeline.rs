//! Resolve, acquire, invoke.
//!
//! The three stages run once, in order; the first failure ends the run.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::Result;
use crate::acquire::ToolAcquirer;
use crate::cache::ToolCache;
use crate::context::RunContext;
use crate::extract::ArchiveExtractor;
use crate::invoke::{ExecutionResult, ToolInvoker, split_args};
use crate::release::{ArtifactDownloader, ReleaseLookup};
use crate::report::Reporter;
use crate::version::{VersionSpecifier, resolve};

/// External collaborators of a run.
pub struct Collaborators {
    /// Latest-release lookup.
    pub lookup: Arc<dyn ReleaseLookup>,
    /// Artifact downloader.
    pub downloader: Arc<dyn ArtifactDownloader>,
    /// Archive extractor.
    pub extractor: Arc<dyn ArchiveExtractor>,
    /// Tool cache.
    pub cache: Arc<dyn ToolCache>,
    /// Host log and failure channels.
    pub reporter: Arc<dyn Reporter>,
}

/// Run the pipeline and return the tool's captured output.
///
/// # Errors
///
/// Returns the first error raised by resolution, acquisition or invocation.
#[instrument(skip_all, fields(platform = %ctx.platform, version = %ctx.inputs.version))]
pub async fn run(ctx: &RunContext, collaborators: &Collaborators) -> Result<ExecutionResult> {
    let reporter = collaborators.reporter.as_ref();
    let tool = ctx.layout.tool.as_str();

    let version = resolve(
        &ctx.inputs.version,
        collaborators.lookup.as_ref(),
        &ctx.policy,
    )
    .await?;
    if ctx.inputs.version == VersionSpecifier::Latest {
        reporter.info(&format!("Latest version is {version}"));
    }

    let acquirer = ToolAcquirer::new(
        Arc::clone(&collaborators.cache),
        Arc::clone(&collaborators.downloader),
        Arc::clone(&collaborators.extractor),
        ctx.layout.clone(),
        ctx.policy,
    );
    let dir = acquirer.acquire(&version, ctx.platform, reporter).await?;
    let program: PathBuf = dir.join(tool);

    let args = split_args(&ctx.inputs.args);
    reporter.info(&format!("Running {tool} {}", args.join(" ")));
    let result = ToolInvoker.invoke(&program, &args).await?;

    if !result.stdout.is_empty() {
        reporter.info(&result.stdout);
    }
    if !result.stderr.is_empty() {
        reporter.warning(&result.stderr);
    }
    reporter.debug(&format!("{tool} execution completed"));
    info!(%version, "Run finished");

    Ok(result)
}

/// Run the pipeline and send any failure through [`Reporter::fail`].
///
/// Returns whether the run succeeded.
pub async fn run_and_report(ctx: &RunContext, collaborators: &Collaborators) -> bool {
    match run(ctx, collaborators).await {
        Ok(_) => true,
        Err(err) => {
            error!(error = ?err, "Run failed");
            collaborators.reporter.fail(&err.to_string());
            false
        }
    }
}
