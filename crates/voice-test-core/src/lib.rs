//! Voice-test Core Library
//!
//! Microphone capture, the recording-session state machine, audio payload
//! types, and contact-info routing for the voice-test submission workflow.
//!
//! # Example
//!
//! ```no_run
//! use voice_test_core::{AudioCapturer, CoreResult, RecordingSession};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut session = RecordingSession::new();
//!     session.start(Box::new(AudioCapturer::open(None)?))?;
//!     sleep(Duration::from_secs(3));
//!     let audio = session.stop()?;
//!
//!     println!("Captured {} ({:?})", audio.file_name, audio.duration);
//!     Ok(())
//! }
//! ```

mod audio;
mod contact;
mod error;
mod payload;

pub use {
    audio::{
        AudioCapturer, CaptureSupport, ChunkSource, DecodedWav, PlaybackState, PreviewPlayer,
        RecordingSession, SessionState,
    },
    contact::ContactInfo,
    error::CaptureError,
    error::Result as CoreResult,
    payload::{ActiveAudio, RecordedAudio, UploadedFile},
};

#[cfg(test)]
mod tests;
