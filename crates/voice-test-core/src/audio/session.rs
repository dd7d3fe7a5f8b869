//! Recording session state machine.
//!
//! All transitions run through the methods on [`RecordingSession`]; the
//! device side sits behind the [`ChunkSource`] seam so the machine can be
//! driven without hardware in tests.

use crate::{CaptureError, CoreResult, payload::RecordedAudio};

use std::{fmt, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture in progress and no finalized result.
    Idle,
    /// Actively buffering audio chunks.
    Recording,
    /// Capture suspended; no chunks accumulate until resumed.
    Paused,
    /// Finalized. Terminal until the result is cleared.
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Paused => "paused",
            SessionState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Source of buffered audio chunks feeding a [`RecordingSession`].
///
/// [`AudioCapturer`](crate::AudioCapturer) is the production
/// implementation; tests substitute a scripted source.
pub trait ChunkSource {
    /// Begin producing chunks. Called once, while the session is Idle.
    fn begin(&mut self) -> CoreResult<()>;
    /// Suspend chunk production.
    fn pause(&mut self) -> CoreResult<()>;
    /// Resume chunk production after a pause.
    fn resume(&mut self) -> CoreResult<()>;
    /// Stop producing and hand over everything buffered so far.
    fn finish(&mut self) -> CoreResult<Vec<Vec<f32>>>;
    /// Release the device without keeping any buffered audio.
    fn abort(&mut self);
    /// Mid-stream failure reported by the backend, if any.
    fn take_failure(&mut self) -> Option<String>;
    /// Sample rate of produced chunks.
    fn sample_rate(&self) -> u32;
    /// Channel count of produced chunks.
    fn channels(&self) -> u16;
}

/// One recording attempt: Idle → Recording ⇄ Paused → Stopped.
///
/// Invariant: `result()` is `Some` if and only if the state is `Stopped`;
/// a stop that captured nothing fails with `NoAudioCaptured` and resets to
/// Idle. The device is held only while Recording or Paused.
pub struct RecordingSession {
    state: SessionState,
    source: Option<Box<dyn ChunkSource>>,
    result: Option<Arc<RecordedAudio>>,
    session_id: Uuid,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            source: None,
            result: None,
            session_id: Uuid::new_v4(),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Finalized audio, present only once stopped.
    pub fn result(&self) -> Option<&Arc<RecordedAudio>> {
        self.result.as_ref()
    }

    /// Session ID of the current or most recent recording, for log
    /// correlation.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// True while the device is held (Recording or Paused).
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Recording | SessionState::Paused)
    }

    /// Begin capturing through `source`. Only valid from Idle; a stopped
    /// session must be cleared first.
    ///
    /// If the source fails to begin, the session stays Idle and the source
    /// is dropped, releasing whatever it held.
    #[track_caller]
    #[instrument(skip(self, source))]
    pub fn start(&mut self, mut source: Box<dyn ChunkSource>) -> CoreResult<()> {
        if self.state != SessionState::Idle {
            return Err(CaptureError::InvalidSessionState {
                state: self.state,
                action: "start recording",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        source.begin()?;

        self.session_id = Uuid::new_v4();
        self.source = Some(source);
        self.state = SessionState::Recording;

        info!(session_id = %self.session_id, "Recording session started");

        Ok(())
    }

    /// Suspend buffering. Only valid while Recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        if self.state != SessionState::Recording {
            return Err(CaptureError::InvalidSessionState {
                state: self.state,
                action: "pause recording",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(source) = self.source.as_mut() {
            source.pause()?;
        }
        self.state = SessionState::Paused;

        info!(session_id = %self.session_id, "Recording session paused");

        Ok(())
    }

    /// Resume buffering. Only valid while Paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        if self.state != SessionState::Paused {
            return Err(CaptureError::InvalidSessionState {
                state: self.state,
                action: "resume recording",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(source) = self.source.as_mut() {
            source.resume()?;
        }
        self.state = SessionState::Recording;

        info!(session_id = %self.session_id, "Recording session resumed");

        Ok(())
    }

    /// Finalize the recording: release the device, concatenate all chunks
    /// and encode them as a single WAV payload. Valid from Recording or
    /// Paused. A session that captured nothing resets to Idle with
    /// `NoAudioCaptured`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<Arc<RecordedAudio>> {
        if !self.is_active() {
            return Err(CaptureError::InvalidSessionState {
                state: self.state,
                action: "stop recording",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut source = match self.source.take() {
            Some(source) => source,
            None => {
                self.state = SessionState::Idle;
                return Err(CaptureError::DeviceError {
                    reason: "no active capture source".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let sample_rate = source.sample_rate();
        let channels = source.channels();

        let chunks = match source.finish() {
            Ok(chunks) => chunks,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };
        drop(source);

        if chunks.iter().all(|chunk| chunk.is_empty()) {
            self.state = SessionState::Idle;
            return Err(CaptureError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let audio = match RecordedAudio::from_chunks(&chunks, sample_rate, channels) {
            Ok(audio) => Arc::new(audio),
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        self.result = Some(Arc::clone(&audio));
        self.state = SessionState::Stopped;

        info!(
            session_id = %self.session_id,
            chunk_count = chunks.len(),
            duration_ms = audio.duration.as_millis(),
            "Recording finalized"
        );

        Ok(audio)
    }

    /// Abort an in-progress capture: release the device and discard any
    /// partially captured chunks. A stopped session keeps its result.
    #[instrument(skip(self))]
    pub fn abort(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.abort();
            warn!(session_id = %self.session_id, "Recording session aborted");
        }
        if self.state != SessionState::Stopped {
            self.state = SessionState::Idle;
        }
    }

    /// Drop everything (device, chunks and result), returning to Idle so
    /// a new session may start.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.abort();
        self.result = None;
        self.state = SessionState::Idle;
    }

    /// Mid-stream device failure reported since the last poll, if any.
    pub fn poll_failure(&mut self) -> Option<String> {
        self.source.as_mut().and_then(|source| source.take_failure())
    }
}
