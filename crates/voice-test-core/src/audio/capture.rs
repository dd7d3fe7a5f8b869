use crate::{CaptureError, CoreResult, audio::session::ChunkSource};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Seconds of audio per buffered chunk. The capture callback rotates the
/// working buffer into the chunk sequence at this interval, mirroring the
/// fixed-increment buffering of the submission workflow.
pub(crate) const CHUNK_SECONDS: usize = 1;

/// Maximum chunks retained (5 minutes at one chunk per second).
/// Prevents unbounded memory growth during long recordings; beyond the
/// cap the oldest chunks are dropped.
pub(crate) const MAX_CHUNKS: usize = 300;

/// Chunked sample buffer shared with the capture callback.
pub(crate) struct ChunkBuffer {
    chunks: VecDeque<Vec<f32>>,
    current: Vec<f32>,
    chunk_len: usize,
}

impl ChunkBuffer {
    pub(crate) fn new(chunk_len: usize) -> Self {
        Self {
            chunks: VecDeque::new(),
            current: Vec::with_capacity(chunk_len),
            chunk_len,
        }
    }

    /// Append interleaved samples, rotating full chunks into the sequence.
    pub(crate) fn push(&mut self, mut data: &[f32]) {
        while !data.is_empty() {
            let take = (self.chunk_len - self.current.len()).min(data.len());
            self.current.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.current.len() == self.chunk_len {
                self.chunks
                    .push_back(std::mem::replace(&mut self.current, Vec::with_capacity(self.chunk_len)));
                // Ring bound: O(1) drop of the oldest chunk
                while self.chunks.len() > MAX_CHUNKS {
                    self.chunks.pop_front();
                }
            }
        }
    }

    /// Hand over everything buffered, including the partial trailing chunk.
    pub(crate) fn drain(&mut self) -> Vec<Vec<f32>> {
        if !self.current.is_empty() {
            let partial = std::mem::take(&mut self.current);
            self.chunks.push_back(partial);
        }
        self.chunks.drain(..).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.chunks.clear();
        self.current.clear();
    }
}

/// Microphone capturer producing one-second chunks of interleaved f32
/// samples. Production [`ChunkSource`] for a recording session.
pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    buffer: Arc<Mutex<ChunkBuffer>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream to ensure no in-flight callback writes after
    /// the lock is acquired in `finish()`.
    shutdown: Arc<AtomicBool>,
    /// Gates the callback while paused. Some backends treat `pause()` as
    /// advisory; this flag guarantees no chunks accumulate either way.
    paused: Arc<AtomicBool>,
    failure: Arc<Mutex<Option<String>>>,
}

impl AudioCapturer {
    /// Open the named input device, or the default one when `selected` is
    /// `None`. Does not start the stream; the session does that on start.
    #[track_caller]
    #[instrument]
    pub fn open(selected: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = match selected {
            Some(name) => host
                .input_devices()
                .map_err(|e| CaptureError::DeviceError {
                    reason: format!("Failed to enumerate input devices: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or(CaptureError::NoMicrophoneFound {
                    location: ErrorLocation::from(Location::caller()),
                })?,
            None => host
                .default_input_device()
                .ok_or(CaptureError::NoMicrophoneFound {
                    location: ErrorLocation::from(Location::caller()),
                })?,
        };

        let config = device
            .default_input_config()
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer opened"
        );

        let config: StreamConfig = config.into();
        let chunk_len = config.sample_rate as usize * config.channels as usize * CHUNK_SECONDS;

        Ok(Self {
            device,
            config,
            stream: None,
            buffer: Arc::new(Mutex::new(ChunkBuffer::new(chunk_len))),
            shutdown: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
            failure: Arc::new(Mutex::new(None)),
        })
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn start_stream(&mut self) -> CoreResult<()> {
        let buffer = Arc::clone(&self.buffer);
        let shutdown = Arc::clone(&self.shutdown);
        let paused = Arc::clone(&self.paused);
        let failure = Arc::clone(&self.failure);

        // Reset flags for a new recording session
        self.shutdown.store(false, Ordering::Release);
        self.paused.store(false, Ordering::Release);

        buffer
            .lock()
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to lock chunk buffer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Check the gates before acquiring the lock: once
                    // finish() sets the shutdown flag no new samples are
                    // written even if the backend fires one more callback
                    // before the stream is dropped, and the paused gate
                    // holds on backends whose pause() is advisory.
                    if shutdown.load(Ordering::Acquire) || paused.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently dropping
                    // audio. A poisoned mutex means a previous holder
                    // panicked, but the chunk data is still valid and usable.
                    let mut buf = buffer.lock().unwrap_or_else(|e| {
                        error!("Chunk buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.push(data);
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                    if let Ok(mut slot) = failure.lock() {
                        *slot = Some(err.to_string());
                    }
                },
                None,
            )
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| CaptureError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    /// Sample rate of the opened device configuration.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Channel count of the opened device configuration.
    pub fn channels(&self) -> u16 {
        self.config.channels
    }
}

impl ChunkSource for AudioCapturer {
    fn begin(&mut self) -> CoreResult<()> {
        self.start_stream()
    }

    fn pause(&mut self) -> CoreResult<()> {
        self.paused.store(true, Ordering::Release);
        if let Some(stream) = &self.stream {
            // Best effort: the paused gate above already stops accumulation
            // on backends that cannot suspend the stream.
            if let Err(e) = stream.pause() {
                debug!("Backend cannot pause stream: {}", e);
            }
        }
        info!("Audio capture paused");
        Ok(())
    }

    fn resume(&mut self) -> CoreResult<()> {
        if let Some(stream) = &self.stream {
            stream.play().map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to resume stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }
        self.paused.store(false, Ordering::Release);
        info!("Audio capture resumed");
        Ok(())
    }

    fn finish(&mut self) -> CoreResult<Vec<Vec<f32>>> {
        // Signal the callback to stop writing BEFORE dropping the stream,
        // so a final in-flight callback observes the flag and returns early
        // even on backends where Stream::drop() is asynchronous.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag and completes before the lock below is acquired.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let chunks = self
            .buffer
            .lock()
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("Failed to lock chunk buffer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .drain();

        debug!(chunk_count = chunks.len(), "Captured audio chunks");

        Ok(chunks)
    }

    fn abort(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
        debug!("Audio capture aborted, chunks discarded");
    }

    fn take_failure(&mut self) -> Option<String> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }

    fn sample_rate(&self) -> u32 {
        AudioCapturer::sample_rate(self)
    }

    fn channels(&self) -> u16 {
        AudioCapturer::channels(self)
    }
}
