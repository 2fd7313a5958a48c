//! GitHub Releases over the REST API.

use async_trait::async_trait;
use gong_action_core::{ArtifactDownloader, FetchError, ReleaseLookup, ReleaseMetadata};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use crate::{Error, Result};

/// Public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("gong-action/", env!("CARGO_PKG_VERSION"));

/// Split `owner/repo`.
///
/// # Errors
///
/// Returns [`Error::InvalidRepository`] unless the input has exactly two
/// non-empty segments.
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok(((*owner).to_string(), (*repo).to_string()))
        }
        _ => Err(Error::InvalidRepository(repository.to_string())),
    }
}

/// Release lookup and artifact download for one repository.
///
/// The token, when set, is only sent to the API host.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
    timeout: Duration,
}

impl GitHubReleases {
    /// Create a client for `owner/repo` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository is malformed or the HTTP client
    /// cannot be built.
    pub fn new(repository: &str, timeout: Duration) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            owner,
            repo,
            token: None,
            timeout,
        })
    }

    /// Use another API base URL (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Authenticate API calls with `token`. Empty tokens are ignored.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn classify(&self, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::TimedOut {
                after: self.timeout,
            }
        } else {
            FetchError::transport(err.to_string())
        }
    }

    async fn send(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> std::result::Result<Response, FetchError> {
        let response = request.send().await.map_err(|e| self.classify(&e))?;
        let status = response.status();
        debug!(%url, %status, "GitHub response");

        if status == StatusCode::NOT_FOUND {
            Err(FetchError::NotFound {
                url: url.to_string(),
            })
        } else if status.is_success() {
            Ok(response)
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl ReleaseLookup for GitHubReleases {
    fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    #[instrument(skip(self), fields(repository = %self.repository()))]
    async fn latest_release(&self) -> std::result::Result<ReleaseMetadata, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, self.owner, self.repo
        );
        let request = self.authorize(
            self.client
                .get(&url)
                .header("Accept", "application/vnd.github+json"),
        );

        let response = self.send(&url, request).await?;
        response
            .json::<ReleaseMetadata>()
            .await
            .map_err(|e| FetchError::transport(format!("Failed to parse release: {e}")))
    }
}

#[async_trait]
impl ArtifactDownloader for GitHubReleases {
    #[instrument(skip(self, dest))]
    async fn download(&self, url: &str, dest: &Path) -> std::result::Result<(), FetchError> {
        let mut response = self.send(url, self.client.get(url)).await?;

        let io_err = |e: std::io::Error| FetchError::transport(format!("{}: {e}", dest.display()));
        let mut file = tokio::fs::File::create(dest).await.map_err(io_err)?;
        let mut written: u64 = 0;

        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(&e))? {
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_err)?;

        debug!(bytes = written, dest = %dest.display(), "Artifact downloaded");
        Ok(())
    }
}
