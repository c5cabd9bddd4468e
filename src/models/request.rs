use std::collections::HashMap;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::format::CaptionFormat;

/// Request to caption a media asset.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct JobRequest {
    #[garde(url)]
    pub media_url: String,

    #[garde(length(min = 1, max = 100))]
    pub provider: String,

    /// Reuse an existing parent id to group this request with earlier jobs.
    #[serde(default)]
    #[garde(length(min = 1, max = 200))]
    pub parent_id: Option<String>,

    #[serde(default = "default_languages")]
    #[garde(length(min = 1), inner(length(min = 2, max = 35)))]
    pub languages: Vec<String>,

    #[garde(length(min = 1))]
    pub output_types: Vec<CaptionFormat>,

    #[serde(default)]
    #[garde(skip)]
    pub provider_params: HashMap<String, String>,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

/// Caption format selector for download and transcript endpoints.
#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    pub format: String,
}

/// Response after canceling a job.
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub canceled: bool,
}
