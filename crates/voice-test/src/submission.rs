//! Voice-test submission transport.
//!
//! The popup talks to the endpoint through the [`SubmissionClient`] seam;
//! tests substitute a mock, production posts multipart/form-data through a
//! blocking HTTP client wrapped in `spawn_blocking`.

use crate::{AppError, AppResult};

use std::{panic::Location, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{info, instrument};
use voice_test_core::{ActiveAudio, ContactInfo};

/// One voice-test submission: both contact fields (either may be empty)
/// and the active audio payload.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// Email as routed by the contact field, possibly empty.
    pub email: String,
    /// Phone as routed by the contact field, possibly empty.
    pub phone: String,
    /// File name for the binary part. Recordings use their generated name.
    pub file_name: String,
    /// MIME type of the payload.
    pub mime: String,
    /// Raw audio payload bytes.
    pub bytes: Vec<u8>,
}

impl SubmissionRequest {
    /// Snapshot the popup form into a request. The payload bytes are
    /// copied so the form keeps its state for retry on failure.
    pub fn new(contact: &ContactInfo, audio: &ActiveAudio) -> Self {
        Self {
            email: contact.email().to_string(),
            phone: contact.phone().to_string(),
            file_name: audio.file_name().to_string(),
            mime: audio.mime().to_string(),
            bytes: audio.bytes().to_vec(),
        }
    }
}

/// Transport seam for the submission endpoint.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// POST the request. `Ok` means the server accepted the submission;
    /// the response body is not interpreted.
    async fn submit(&self, request: SubmissionRequest) -> AppResult<()>;
}

/// HTTP implementation posting `email`, `phone` and `audioFile` as one
/// multipart/form-data body. Since the blocking HTTP stack must not run
/// on an async worker, the request is wrapped in `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct HttpSubmissionClient {
    endpoint_url: String,
    timeout: Duration,
}

impl HttpSubmissionClient {
    /// Client for the configured endpoint. The URL is validated lazily at
    /// submit time so the popup can open before it is configured.
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    #[instrument(skip(self, request), fields(file_name = %request.file_name, byte_len = request.bytes.len()))]
    async fn submit(&self, request: SubmissionRequest) -> AppResult<()> {
        if !self.endpoint_url.starts_with("http://") && !self.endpoint_url.starts_with("https://") {
            return Err(AppError::ConfigError {
                reason: format!(
                    "Submission endpoint not configured: {:?}. Set [submit] endpoint_url in the config file.",
                    self.endpoint_url
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let endpoint_url = self.endpoint_url.clone();
        let timeout = self.timeout;

        let status = tokio::task::spawn_blocking(move || -> AppResult<reqwest::StatusCode> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| AppError::SubmissionFailed {
                    reason: format!("Failed to build HTTP client: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let part = reqwest::blocking::multipart::Part::bytes(request.bytes)
                .file_name(request.file_name)
                .mime_str(&request.mime)
                .map_err(|e| AppError::SubmissionFailed {
                    reason: format!("Invalid payload type: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let form = reqwest::blocking::multipart::Form::new()
                .text("email", request.email)
                .text("phone", request.phone)
                .part("audioFile", part);

            let response = client
                .post(&endpoint_url)
                .multipart(form)
                .send()
                .map_err(|e| AppError::SubmissionFailed {
                    reason: format!("Request failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            Ok(response.status())
        })
        .await
        .map_err(|e| AppError::SubmissionFailed {
            reason: format!("Submission task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })??;

        if !status.is_success() {
            return Err(AppError::SubmissionFailed {
                reason: format!("Server returned {}", status),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(%status, "Voice test submitted");

        Ok(())
    }
}
