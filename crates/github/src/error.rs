//! Client setup errors.

use thiserror::Error;

/// Result type for client construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up the GitHub client.
#[derive(Error, Debug)]
pub enum Error {
    /// The repository is not of the form `owner/repo`.
    #[error("Invalid repository '{0}': expected owner/repo")]
    InvalidRepository(String),

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
