//! Audio payload types: the finalized recording, the uploaded file, and
//! the tagged union that makes "exactly one active payload" structural.

use crate::{
    CaptureError, CoreResult,
    audio::{DecodedWav, encode},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use error_location::ErrorLocation;
use tracing::{info, instrument};
use uuid::Uuid;

/// Accepted upload extensions and their MIME types.
const AUDIO_TYPES: &[(&str, &str)] = &[
    ("aac", "audio/aac"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    ("mp3", "audio/mpeg"),
    ("oga", "audio/ogg"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("webm", "audio/webm"),
];

/// MIME type of finalized recordings.
pub(crate) const RECORDING_MIME: &str = "audio/wav";

/// A finalized in-app recording: one WAV payload with a generated name.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    /// Complete WAV file contents.
    pub wav_bytes: Vec<u8>,
    /// Sample rate the audio was captured at.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Recorded duration.
    pub duration: Duration,
    /// Generated submission file name (`voice-test-<uuid>.wav`).
    pub file_name: String,
}

impl RecordedAudio {
    /// Encode captured samples into a single WAV payload.
    #[track_caller]
    #[instrument(skip(samples))]
    pub fn from_samples(samples: &[f32], sample_rate: u32, channels: u16) -> CoreResult<Self> {
        if samples.is_empty() || sample_rate == 0 {
            return Err(CaptureError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let wav_bytes = encode::encode_wav(samples, sample_rate, channels)?;

        let frames = samples.len() as u64 / u64::from(channels.max(1));
        let duration = Duration::from_secs_f64(frames as f64 / f64::from(sample_rate));
        let file_name = format!("voice-test-{}.wav", Uuid::new_v4());

        info!(
            byte_len = wav_bytes.len(),
            duration_ms = duration.as_millis(),
            file_name = %file_name,
            "Recording encoded"
        );

        Ok(Self {
            wav_bytes,
            sample_rate,
            channels,
            duration,
            file_name,
        })
    }

    /// Concatenate buffered chunks and encode them as one payload.
    #[track_caller]
    pub(crate) fn from_chunks(
        chunks: &[Vec<f32>],
        sample_rate: u32,
        channels: u16,
    ) -> CoreResult<Self> {
        let samples: Vec<f32> = chunks.iter().flatten().copied().collect();
        Self::from_samples(&samples, sample_rate, channels)
    }
}

/// A user-selected audio file, read eagerly at selection time.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Where the file was selected from.
    pub path: PathBuf,
    /// File name carried into the submission.
    pub file_name: String,
    /// MIME type derived from the extension.
    pub mime: String,
    /// Complete file contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Load an audio file, rejecting anything whose extension is not in
    /// the audio allowlist. Rejection leaves no state behind.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> CoreResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| CaptureError::InvalidAudioFile {
                path: path.to_path_buf(),
                reason: "missing file extension".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mime = AUDIO_TYPES
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, mime)| (*mime).to_string())
            .ok_or_else(|| CaptureError::InvalidAudioFile {
                path: path.to_path_buf(),
                reason: format!("unsupported extension .{}", ext),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let bytes = std::fs::read(path).map_err(|source| CaptureError::FileUnreadable {
            path: path.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload.{}", ext));

        info!(
            path = ?path,
            byte_len = bytes.len(),
            mime = %mime,
            "Audio file accepted"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime,
            bytes,
        })
    }

    fn is_wav(&self) -> bool {
        self.mime == RECORDING_MIME
    }
}

/// The audio payload eligible for submission. Most recently produced
/// source wins; holding this as `Option<ActiveAudio>` makes "none" and
/// "both" unrepresentable.
#[derive(Debug, Clone)]
pub enum ActiveAudio {
    /// A finalized in-app recording.
    Recorded(Arc<RecordedAudio>),
    /// A user-selected file.
    Uploaded(UploadedFile),
}

impl ActiveAudio {
    /// File name carried into the submission. Recordings use their
    /// generated name.
    pub fn file_name(&self) -> &str {
        match self {
            ActiveAudio::Recorded(audio) => &audio.file_name,
            ActiveAudio::Uploaded(file) => &file.file_name,
        }
    }

    /// MIME type of the payload.
    pub fn mime(&self) -> &str {
        match self {
            ActiveAudio::Recorded(_) => RECORDING_MIME,
            ActiveAudio::Uploaded(file) => &file.mime,
        }
    }

    /// Raw payload bytes.
    pub fn bytes(&self) -> &[u8] {
        match self {
            ActiveAudio::Recorded(audio) => &audio.wav_bytes,
            ActiveAudio::Uploaded(file) => &file.bytes,
        }
    }

    /// Short human-readable description for the popup view.
    pub fn label(&self) -> String {
        match self {
            ActiveAudio::Recorded(audio) => {
                format!("recording {} ({:.1}s)", audio.file_name, audio.duration.as_secs_f64())
            }
            ActiveAudio::Uploaded(file) => {
                format!("file {} ({} bytes)", file.file_name, file.bytes.len())
            }
        }
    }

    /// Decode the payload for preview playback. Recordings are always
    /// WAV; uploads are previewable only when they are WAV themselves.
    #[track_caller]
    pub fn decode_for_preview(&self) -> CoreResult<DecodedWav> {
        match self {
            ActiveAudio::Recorded(audio) => encode::decode_wav(&audio.wav_bytes),
            ActiveAudio::Uploaded(file) if file.is_wav() => encode::decode_wav(&file.bytes),
            ActiveAudio::Uploaded(file) => Err(CaptureError::UnsupportedPreview {
                mime: file.mime.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
