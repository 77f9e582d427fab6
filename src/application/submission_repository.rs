// Repository ports for the document store
use crate::domain::submission::Submission;
use crate::domain::visibility::PublicSettings;
use async_trait::async_trait;
use thiserror::Error;

/// Failure reading from the document store. Shown to the user as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to reach the document store: {0}")]
    Transport(String),

    #[error("Permission denied by the document store (status {status})")]
    Permission { status: u16 },

    #[error("Document store query failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode document store response: {0}")]
    Decode(String),

    #[error("Fetch was interrupted: {0}")]
    Interrupted(String),
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// All submissions, newest first.
    async fn fetch_all(&self) -> Result<Vec<Submission>, FetchError>;
}

#[async_trait]
pub trait VisibilitySettings: Send + Sync {
    /// Current published/unpublished state.
    async fn load(&self) -> Result<PublicSettings, FetchError>;
}
