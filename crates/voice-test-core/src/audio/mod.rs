mod capability;
pub(crate) mod capture;
pub(crate) mod encode;
mod playback;
mod session;

pub use {
    capability::CaptureSupport,
    capture::AudioCapturer,
    encode::DecodedWav,
    playback::{PlaybackState, PreviewPlayer},
    session::{ChunkSource, RecordingSession, SessionState},
};
