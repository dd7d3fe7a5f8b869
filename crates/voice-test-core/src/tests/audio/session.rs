use crate::{
    CaptureError, CoreResult,
    audio::{AudioCapturer, ChunkSource, RecordingSession, SessionState},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;

/// Scripted chunk source so the state machine can be driven without a
/// microphone.
struct FakeChunkSource {
    chunks: Vec<Vec<f32>>,
    released: Arc<AtomicBool>,
    fail_begin: bool,
    failure: Option<String>,
}

impl FakeChunkSource {
    fn with_chunks(chunks: Vec<Vec<f32>>) -> Self {
        Self {
            chunks,
            released: Arc::new(AtomicBool::new(false)),
            fail_begin: false,
            failure: None,
        }
    }

    fn silent() -> Self {
        Self::with_chunks(Vec::new())
    }

    fn released_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl ChunkSource for FakeChunkSource {
    fn begin(&mut self) -> CoreResult<()> {
        if self.fail_begin {
            return Err(CaptureError::DeviceError {
                reason: "microphone access denied".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        Ok(())
    }

    fn resume(&mut self) -> CoreResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> CoreResult<Vec<Vec<f32>>> {
        self.released.store(true, Ordering::Release);
        Ok(std::mem::take(&mut self.chunks))
    }

    fn abort(&mut self) {
        self.released.store(true, Ordering::Release);
        self.chunks.clear();
    }

    fn take_failure(&mut self) -> Option<String> {
        self.failure.take()
    }

    fn sample_rate(&self) -> u32 {
        16_000
    }

    fn channels(&self) -> u16 {
        1
    }
}

/// WHAT: Full start/pause/resume/stop sequence finalizes one payload
/// WHY: The result must exist exactly when stop is reached with audio
#[test]
#[allow(clippy::unwrap_used)]
fn given_start_pause_resume_stop_when_chunks_captured_then_result_present() {
    // Given: An idle session and a source holding two seconds of audio
    let mut session = RecordingSession::new();
    let source = FakeChunkSource::with_chunks(vec![vec![0.1f32; 16_000], vec![0.2f32; 16_000]]);

    // When: Driving the full transition sequence
    session.start(Box::new(source)).unwrap();
    assert_eq!(session.state(), SessionState::Recording);
    session.pause().unwrap();
    assert_eq!(session.state(), SessionState::Paused);
    session.resume().unwrap();
    assert_eq!(session.state(), SessionState::Recording);
    let audio = session.stop().unwrap();

    // Then: Session is stopped with a single concatenated WAV result
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(session.result().is_some());
    assert!(audio.file_name.starts_with("voice-test-"));
    assert!(audio.file_name.ends_with(".wav"));
    assert!(!audio.wav_bytes.is_empty());
    assert_eq!(audio.duration.as_secs(), 2);
}

/// WHAT: Stop with zero captured chunks fails and resets to Idle
/// WHY: The result exists iff stop was reached with at least one chunk
#[test]
#[allow(clippy::unwrap_used)]
fn given_silent_source_when_stopped_then_no_audio_error_and_idle() {
    // Given: A recording session whose source produced nothing
    let mut session = RecordingSession::new();
    session.start(Box::new(FakeChunkSource::silent())).unwrap();

    // When: Stopping
    let result = session.stop();

    // Then: NoAudioCaptured, session back to Idle with no result
    assert!(matches!(result, Err(CaptureError::NoAudioCaptured { .. })));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.result().is_none());
}

/// WHAT: A stopped session rejects a new start until cleared
/// WHY: A new session may begin only after the current result is cleared
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_session_when_starting_again_then_invalid_state() {
    // Given: A session stopped with a result
    let mut session = RecordingSession::new();
    session
        .start(Box::new(FakeChunkSource::with_chunks(vec![vec![0.3f32; 160]])))
        .unwrap();
    session.stop().unwrap();

    // When: Starting again without clearing
    let result = session.start(Box::new(FakeChunkSource::silent()));

    // Then: Rejected with the stopped state named
    assert!(matches!(
        result,
        Err(CaptureError::InvalidSessionState {
            state: SessionState::Stopped,
            ..
        })
    ));

    // And: Clearing re-enables start
    session.clear();
    assert!(session.result().is_none());
    assert!(session.start(Box::new(FakeChunkSource::silent())).is_ok());
}

/// WHAT: Pause and resume are rejected outside their source states
/// WHY: Transition guards keep the machine consistent under misuse
#[test]
#[allow(clippy::unwrap_used)]
fn given_wrong_state_when_pausing_or_resuming_then_invalid_state() {
    // Given: An idle session
    let mut session = RecordingSession::new();

    // When/Then: Pause from Idle is rejected
    assert!(matches!(
        session.pause(),
        Err(CaptureError::InvalidSessionState { .. })
    ));

    // When/Then: Resume while Recording (not Paused) is rejected
    session
        .start(Box::new(FakeChunkSource::with_chunks(vec![vec![0.1f32; 16]])))
        .unwrap();
    assert!(matches!(
        session.resume(),
        Err(CaptureError::InvalidSessionState { .. })
    ));

    // And: Stop from Idle is rejected too
    let mut idle = RecordingSession::new();
    assert!(matches!(
        idle.stop(),
        Err(CaptureError::InvalidSessionState { .. })
    ));
}

/// WHAT: Abort releases the device and discards partial chunks
/// WHY: Error paths and popup close must never leak the microphone
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_aborted_then_device_released_and_idle() {
    // Given: A recording session with buffered chunks
    let mut session = RecordingSession::new();
    let source = FakeChunkSource::with_chunks(vec![vec![0.1f32; 16_000]]);
    let released = source.released_flag();
    session.start(Box::new(source)).unwrap();

    // When: Aborting mid-session
    session.abort();

    // Then: Device released, chunks discarded, state Idle, no result
    assert!(released.load(Ordering::Acquire));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.result().is_none());
}

/// WHAT: A failing source leaves the session Idle with no device held
/// WHY: Denied microphone access must be recoverable by retrying
#[test]
fn given_source_begin_failure_when_starting_then_session_stays_idle() {
    // Given: A source that fails to begin (permission denied)
    let mut session = RecordingSession::new();
    let mut source = FakeChunkSource::silent();
    source.fail_begin = true;

    // When: Starting
    let result = session.start(Box::new(source));

    // Then: The error surfaces and the session remains Idle
    assert!(matches!(result, Err(CaptureError::DeviceError { .. })));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.start(Box::new(FakeChunkSource::silent())).is_ok());
}

/// WHAT: Real microphone capture round-trips through the session
/// WHY: Exercises the cpal-backed ChunkSource end to end
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_default_microphone_when_recording_briefly_then_wav_produced() {
    // Given: A session over the default input device
    let mut session = RecordingSession::new();
    session
        .start(Box::new(AudioCapturer::open(None).unwrap()))
        .unwrap();

    // When: Recording for 1.5 seconds
    std::thread::sleep(std::time::Duration::from_millis(1_500));
    let audio = session.stop().unwrap();

    // Then: A WAV payload was finalized
    assert_eq!(&audio.wav_bytes[0..4], b"RIFF");
    assert_eq!(session.state(), SessionState::Stopped);
}

/// WHAT: Mid-stream backend failures surface through poll_failure
/// WHY: The popup polls for device errors to abort and notify the user
#[test]
#[allow(clippy::unwrap_used)]
fn given_backend_failure_when_polled_then_reason_returned_once() {
    // Given: A recording session whose backend reported a failure
    let mut session = RecordingSession::new();
    let mut source = FakeChunkSource::with_chunks(vec![vec![0.1f32; 16]]);
    source.failure = Some("device unplugged".to_string());
    session.start(Box::new(source)).unwrap();

    // When: Polling twice
    let first = session.poll_failure();
    let second = session.poll_failure();

    // Then: The reason is delivered exactly once
    assert_eq!(first.as_deref(), Some("device unplugged"));
    assert!(second.is_none());
}
