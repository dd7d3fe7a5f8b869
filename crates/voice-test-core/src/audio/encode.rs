//! In-memory WAV encode/decode for recording finalization and preview.

use crate::{CaptureError, CoreResult};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use tracing::debug;

/// Decoded WAV payload ready for an output stream.
#[derive(Debug, Clone)]
pub struct DecodedWav {
    /// Interleaved f32 samples, normalized to [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

/// Encode interleaved f32 samples as a 32-bit float WAV file in memory.
pub(crate) fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> CoreResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());

    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| CaptureError::CodecError {
            reason: format!("Failed to create WAV writer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    for &sample in samples {
        writer.write_sample(sample).map_err(|e| CaptureError::CodecError {
            reason: format!("Failed to write sample: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    writer.finalize().map_err(|e| CaptureError::CodecError {
        reason: format!("Failed to finalize WAV: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let bytes = cursor.into_inner();

    debug!(
        sample_count = samples.len(),
        byte_len = bytes.len(),
        "Samples encoded as WAV"
    );

    Ok(bytes)
}

/// Decode a WAV payload into interleaved f32 samples. Integer formats are
/// normalized to [-1.0, 1.0].
pub(crate) fn decode_wav(bytes: &[u8]) -> CoreResult<DecodedWav> {
    let mut reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| CaptureError::CodecError {
            reason: format!("Failed to read WAV: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| CaptureError::CodecError {
                reason: format!("Failed to decode float samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(CaptureError::CodecError {
                    reason: format!("Unsupported bit depth: {}", spec.bits_per_sample),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()
                .map_err(|e| CaptureError::CodecError {
                    reason: format!("Failed to decode int samples: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?
        }
    };

    debug!(
        sample_count = samples.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "WAV decoded"
    );

    Ok(DecodedWav {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}
