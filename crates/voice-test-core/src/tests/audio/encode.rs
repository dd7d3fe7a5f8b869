use crate::{CaptureError, audio::encode};

use std::io::Cursor;

/// WHAT: Encoded recordings are well-formed WAV files
/// WHY: The submission payload must be playable by the receiving side
#[test]
#[allow(clippy::unwrap_used)]
fn given_captured_samples_when_encoded_then_valid_wav_produced() {
    // Given: One second of stereo audio
    let samples = vec![0.25f32; 44_100 * 2];

    // When: Encoding
    let bytes = encode::encode_wav(&samples, 44_100, 2).unwrap();

    // Then: RIFF/WAVE container holding every sample at the right spec
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");

    let decoded = encode::decode_wav(&bytes).unwrap();
    assert_eq!(decoded.sample_rate, 44_100);
    assert_eq!(decoded.channels, 2);
    assert_eq!(decoded.samples.len(), samples.len());
}

/// WHAT: Integer WAV uploads decode to normalized f32 samples
/// WHY: Preview playback feeds f32 output streams regardless of source depth
#[test]
#[allow(clippy::unwrap_used)]
fn given_int16_wav_when_decoded_then_samples_normalized() {
    // Given: A 16-bit integer WAV with full-scale and half-scale samples
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    writer.write_sample(i32::from(i16::MAX)).unwrap();
    writer.write_sample(i32::from(i16::MIN / 2)).unwrap();
    writer.finalize().unwrap();

    // When: Decoding
    let decoded = encode::decode_wav(&cursor.into_inner()).unwrap();

    // Then: Samples land in [-1.0, 1.0] at the expected magnitudes
    assert_eq!(decoded.samples.len(), 2);
    assert!((decoded.samples[0] - 1.0).abs() < 1e-3);
    assert!((decoded.samples[1] + 0.5).abs() < 1e-3);
}

/// WHAT: Garbage bytes are rejected with a codec error
/// WHY: A corrupt upload must not crash preview playback
#[test]
fn given_non_wav_bytes_when_decoded_then_codec_error() {
    // Given: Bytes that are not a WAV container
    let bytes = b"ID3\x04\x00\x00\x00\x00\x00\x00not audio at all";

    // When: Decoding
    let result = encode::decode_wav(bytes);

    // Then: CodecError, no panic
    assert!(matches!(result, Err(CaptureError::CodecError { .. })));
}
