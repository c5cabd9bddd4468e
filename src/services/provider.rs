use async_trait::async_trait;

use crate::models::format::CaptionFormat;
use crate::models::job::{Job, ProviderJob};

/// Adapter to one third-party captioning vendor.
///
/// Providers are registered on the [`Client`](crate::services::client::Client)
/// under [`Provider::name`] and resolved by the name recorded on each job.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name jobs use to select this provider.
    fn name(&self) -> &str;

    /// Hand a job to the vendor and return the vendor's identifier for it.
    async fn dispatch_job(&self, job: &Job) -> Result<String, ProviderError>;

    /// Current status of one vendor job.
    async fn get_job(&self, provider_id: &str) -> Result<ProviderJob, ProviderError>;

    /// Current status of several vendor jobs in one call. Unknown ids are omitted.
    async fn get_jobs(&self, provider_ids: &[String]) -> Result<Vec<ProviderJob>, ProviderError>;

    /// Raw caption file for a finished vendor job.
    async fn download(
        &self,
        provider_id: &str,
        format: CaptionFormat,
    ) -> Result<Vec<u8>, ProviderError>;

    /// Whether [`Provider::cancel_job`] is implemented. Must agree with it.
    fn supports_cancel(&self) -> bool {
        false
    }

    /// Cancel an in-flight vendor job. Vendors without cancellation keep this default.
    async fn cancel_job(&self, _provider_id: &str) -> Result<(), ProviderError> {
        Err(ProviderError::CancelUnsupported(self.name().to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vendor API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid vendor job id: {0}")]
    InvalidId(String),

    #[error("Unexpected vendor response: {0}")]
    UnexpectedResponse(String),

    #[error("Provider {0} does not support job cancellation")]
    CancelUnsupported(String),

    #[error("download error: {0}")]
    Download(String),

    #[error("{0}")]
    Message(String),
}
