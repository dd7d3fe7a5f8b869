use crate::audio::SessionState;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture and audio payload errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio output device available for preview playback.
    #[error("No playback device found {location}")]
    NoPlaybackDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed. Covers denied device access and
    /// mid-stream failures reported by the backend.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio data captured or provided.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Selected file is not an accepted audio type.
    #[error("Not an audio file: {path:?} ({reason}) {location}")]
    InvalidAudioFile {
        /// Path of the rejected file.
        path: std::path::PathBuf,
        /// Why the file was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Selected file could not be read from disk.
    #[error("Failed to read {path:?}: {source} {location}")]
    FileUnreadable {
        /// Path of the unreadable file.
        path: std::path::PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// WAV encoding or decoding failed.
    #[error("WAV codec error: {reason} {location}")]
    CodecError {
        /// Description of the codec error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Preview playback is not supported for this payload type.
    #[error("Preview not supported for {mime} {location}")]
    UnsupportedPreview {
        /// MIME type of the payload that cannot be previewed.
        mime: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session operation was attempted from the wrong state.
    #[error("Cannot {action} while session is {state} {location}")]
    InvalidSessionState {
        /// State the session was in.
        state: SessionState,
        /// The rejected operation.
        action: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
