use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::format::CaptionFormat;
use crate::models::request::JobRequest;

/// Status recorded on a job right after it was handed to a vendor.
pub const DISPATCHED_STATUS: &str = "dispatched";

/// Status shown on a job once it was canceled. Terminality comes from
/// [`Job::canceled`], never from this text.
pub const CANCELED_STATUS: &str = "canceled";

/// One unit of captioning work: a media asset, one language, handled by one vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    /// Groups the jobs spawned by a single dispatch request.
    pub parent_id: String,
    pub media_url: String,
    /// Name of the registered provider handling this job.
    pub provider: String,
    /// Vendor-specific dispatch parameters, forwarded as-is.
    #[serde(default)]
    pub provider_params: HashMap<String, String>,
    /// The vendor's own identifier, recorded on dispatch.
    pub provider_id: Option<String>,
    pub language: String,
    /// Caption formats requested for this job; one output per format once done.
    #[serde(default)]
    pub output_types: Vec<CaptionFormat>,
    /// Free-text status as last reported by the vendor.
    pub status: String,
    pub done: bool,
    /// Set once the job was canceled through the broker.
    #[serde(default)]
    pub canceled: bool,
    #[serde(default)]
    pub outputs: Vec<JobOutput>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A finished caption file for a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    pub filename: String,
    pub url: String,
}

/// Status of a vendor job as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderJob {
    pub provider_id: String,
    pub status: String,
    /// True once the vendor reports the captions as ready/delivered.
    pub done: bool,
}

/// Condensed view of a job used when listing siblings of a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub parent_id: String,
    pub provider: String,
    pub language: String,
    pub status: String,
    pub done: bool,
    pub canceled: bool,
    pub outputs: Vec<JobOutput>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Build one job per requested language. All jobs share a parent id,
    /// generated when the request does not carry one.
    pub fn from_request(request: &JobRequest) -> Vec<Job> {
        let parent_id = request
            .parent_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        request
            .languages
            .iter()
            .map(|language| Job {
                id: Uuid::new_v4().to_string(),
                parent_id: parent_id.clone(),
                media_url: request.media_url.clone(),
                provider: request.provider.clone(),
                provider_params: request.provider_params.clone(),
                provider_id: None,
                language: language.clone(),
                output_types: request.output_types.clone(),
                status: String::new(),
                done: false,
                canceled: false,
                outputs: Vec::new(),
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Mark the job canceled. Its outputs stay empty.
    pub fn cancel(&mut self) {
        self.canceled = true;
        self.status = CANCELED_STATUS.to_string();
        self.updated_at = Utc::now();
    }

    /// Ready and canceled jobs never change again.
    pub fn is_terminal(&self) -> bool {
        self.done || self.is_canceled()
    }

    /// Filename of the output for `format`.
    pub fn output_filename(&self, format: CaptionFormat) -> String {
        format!("{}.{}", self.id, format.extension())
    }

    /// Merge a vendor status report into the job.
    ///
    /// The first report with `done` set flips the job to done and fills in
    /// one output per requested format, with URLs from `resolve_url(provider, filename)`.
    /// Returns true when this call completed the job.
    pub fn apply_provider_status<F>(&mut self, report: &ProviderJob, resolve_url: F) -> bool
    where
        F: Fn(&str, &str) -> String,
    {
        self.status = report.status.clone();
        self.updated_at = Utc::now();

        if !report.done || self.done {
            return false;
        }

        self.done = true;
        self.outputs = self
            .output_types
            .iter()
            .map(|format| {
                let filename = self.output_filename(*format);
                JobOutput {
                    url: resolve_url(&self.provider, &filename),
                    filename,
                }
            })
            .collect();
        true
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            provider: self.provider.clone(),
            language: self.language.clone(),
            status: self.status.clone(),
            done: self.done,
            canceled: self.canceled,
            outputs: self.outputs.clone(),
            created_at: self.created_at,
        }
    }
}
