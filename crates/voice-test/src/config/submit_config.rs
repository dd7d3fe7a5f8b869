use crate::config::{default_endpoint_url, default_timeout_secs};

use serde::{Deserialize, Serialize};

/// Submission endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// URL the multipart voice-test submission is POSTed to.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}
