//! Core of the gong workflow step.
//!
//! A run resolves a version specifier, acquires the matching `gong` binary
//! (from the tool cache or by download) and invokes it:
//!
//! - [`version`] turns `latest` or an explicit `x.y.z` into a [`ResolvedVersion`]
//! - [`acquire`] returns a cached directory holding the executable
//! - [`invoke`] runs it and captures its output
//! - [`pipeline`] composes the three and reports through a [`Reporter`]
//!
//! Network access sits behind [`ReleaseLookup`] and [`ArtifactDownloader`] so
//! the pipeline can be driven by in-memory fakes.
//!
//! # Example
//!
//! ```ignore
//! use gong_action_core::{pipeline, ActionInputs, Platform, RunContext};
//!
//! let ctx = RunContext::new(ActionInputs::default(), Platform::detect()?);
//! let ok = pipeline::run_and_report(&ctx, &collaborators).await;
//! ```

#![warn(missing_docs)]

pub mod acquire;
pub mod artifact;
pub mod cache;
pub mod context;
mod error;
pub mod extract;
pub mod fetch;
pub mod invoke;
pub mod pipeline;
pub mod platform;
pub mod release;
pub mod report;
pub mod version;

pub use acquire::ToolAcquirer;
pub use artifact::ArtifactLayout;
pub use cache::{DirToolCache, ToolCache};
pub use context::{ActionInputs, RunContext};
pub use error::{Error, ReleaseLookupError, Result};
pub use extract::{ArchiveExtractor, ExtractError, TarGzExtractor};
pub use fetch::{FetchError, FetchPolicy};
pub use invoke::{ExecutionResult, ToolInvoker, split_args};
pub use pipeline::Collaborators;
pub use platform::{Arch, Os, Platform};
pub use release::{ArtifactDownloader, ReleaseAsset, ReleaseLookup, ReleaseMetadata};
pub use report::{Level, RecordingReporter, Reporter};
pub use version::{ResolvedVersion, VersionSpecifier};
