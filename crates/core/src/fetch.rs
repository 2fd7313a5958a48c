//! Network failure classification and the retry/deadline policy.
//!
//! Network collaborators classify failures into [`FetchError`] at their own
//! boundary. Callers switch on the variant and never inspect message text.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Classified failure of a network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote resource does not exist (HTTP 404).
    #[error("HTTP 404 Not Found: {url}")]
    NotFound {
        /// Requested URL.
        url: String,
    },

    /// The server answered with a non-success status other than 404.
    #[error("HTTP {status}: {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Connection, TLS, body or filesystem failure while transferring.
    #[error("{message}")]
    Transport {
        /// Underlying message.
        message: String,
    },

    /// The call did not complete within its deadline.
    #[error("request timed out after {after:?}")]
    TimedOut {
        /// The deadline that expired.
        after: Duration,
    },
}

impl FetchError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Whether this failure is worth another attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::NotFound { .. } => false,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Transport { .. } | Self::TimedOut { .. } => true,
        }
    }
}

/// Bounded retry with exponential backoff and a per-attempt deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total number of attempts, including the first one. At least 1.
    pub attempts: u32,
    /// Delay before the second attempt; doubled after each retry.
    pub initial_backoff: Duration,
    /// Deadline applied to each attempt.
    pub deadline: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_secs(1),
            deadline: Duration::from_secs(300),
        }
    }
}

impl FetchPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn single_attempt(deadline: Duration) -> Self {
        Self {
            attempts: 1,
            initial_backoff: Duration::ZERO,
            deadline,
        }
    }

    /// Set the number of attempts.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Set the per-attempt deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set the initial backoff.
    #[must_use]
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Run `op` under this policy.
    ///
    /// Each attempt is bounded by `deadline`; an expiry counts as
    /// [`FetchError::TimedOut`]. Only transient failures are retried.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let attempts = self.attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let outcome = match tokio::time::timeout(self.deadline, op()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::TimedOut {
                    after: self.deadline,
                }),
            };

            match outcome {
                Err(err) if err.is_transient() && attempt < attempts => {
                    warn!(%operation, attempt, error = %err, ?backoff, "Transient failure, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
