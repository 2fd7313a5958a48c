//! gong-action entry point.

use clap::Parser;
use gong_action::Cli;
use gong_action::tracing::init_tracing;
use gong_action_github::GitHubActionsReporter;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.tracing_config())?;

    let reporter = Arc::new(GitHubActionsReporter::default());
    if gong_action::run(&cli, reporter).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
