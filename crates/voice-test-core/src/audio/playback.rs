//! Preview playback for the active audio payload.

use crate::{CaptureError, CoreResult, audio::encode::DecodedWav};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use cpal::{
    Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Play/pause affordance state for the preview control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Audio is playing.
    Playing,
    /// Playback suspended; toggling resumes from the same position.
    Paused,
}

/// One-shot player over a decoded payload.
///
/// Dropping the player stops playback and releases the output device; the
/// popup drops it when the active payload is replaced and on close. Once
/// every sample has been handed to the device the `finished` flag latches
/// and the control resets to its "play" affordance.
pub struct PreviewPlayer {
    stream: Stream,
    state: PlaybackState,
    finished: Arc<AtomicBool>,
}

impl PreviewPlayer {
    /// Open the default output device and start playing `audio`.
    #[track_caller]
    #[instrument(skip(audio))]
    pub fn start(audio: DecodedWav) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(CaptureError::NoPlaybackDevice {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = StreamConfig {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let sample_count = audio.samples.len();
        let samples = Arc::new(audio.samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_samples = Arc::clone(&samples);
        let cb_position = Arc::clone(&position);
        let cb_finished = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let pos = cb_position.load(Ordering::Acquire);
                    if pos >= cb_samples.len() {
                        out.fill(0.0);
                        cb_finished.store(true, Ordering::Release);
                        return;
                    }
                    let take = out.len().min(cb_samples.len() - pos);
                    out[..take].copy_from_slice(&cb_samples[pos..pos + take]);
                    out[take..].fill(0.0);
                    cb_position.store(pos + take, Ordering::Release);
                    if pos + take >= cb_samples.len() {
                        cb_finished.store(true, Ordering::Release);
                    }
                },
                |err| {
                    error!("Playback stream error: {}", err);
                },
                None,
            )
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to build playback stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| CaptureError::DeviceError {
            reason: format!("Failed to start playback: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(
            sample_count,
            sample_rate = config.sample_rate,
            channels = config.channels,
            "Preview playback started"
        );

        Ok(Self {
            stream,
            state: PlaybackState::Playing,
            finished,
        })
    }

    /// Toggle between playing and paused.
    #[track_caller]
    pub fn toggle(&mut self) -> CoreResult<PlaybackState> {
        self.state = match self.state {
            PlaybackState::Playing => {
                // Best effort: some backends cannot suspend the stream, in
                // which case the remaining samples drain to silence anyway.
                if let Err(e) = self.stream.pause() {
                    debug!("Backend cannot pause playback: {}", e);
                }
                PlaybackState::Paused
            }
            PlaybackState::Paused => {
                self.stream.play().map_err(|e| CaptureError::DeviceError {
                    reason: format!("Failed to resume playback: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                PlaybackState::Playing
            }
        };

        Ok(self.state)
    }

    /// Current affordance state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// True once every sample has been handed to the device.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}
