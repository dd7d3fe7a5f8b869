use crate::audio::capture::{ChunkBuffer, MAX_CHUNKS};

use std::sync::{Arc, Mutex};

/// WHAT: Samples rotate into fixed-size chunks with a partial tail
/// WHY: Chunk boundaries must match the fixed buffering interval
#[test]
fn given_samples_spanning_chunks_when_pushed_then_rotated_with_partial_tail() {
    // Given: A buffer with a chunk length of 8 samples
    let mut buf = ChunkBuffer::new(8);

    // When: Pushing 2.5 chunks worth of samples in uneven slices
    buf.push(&[0.5f32; 5]);
    buf.push(&[0.5f32; 10]);
    buf.push(&[0.5f32; 5]);

    // Then: Two full chunks plus one partial tail of 4 samples
    let chunks = buf.drain();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), 8);
    assert_eq!(chunks[1].len(), 8);
    assert_eq!(chunks[2].len(), 4);
}

/// WHAT: Chunk sequence respects the MAX_CHUNKS limit
/// WHY: Prevents unbounded memory growth during long recordings
#[test]
fn given_buffer_at_max_capacity_when_adding_chunks_then_oldest_discarded() {
    // Given: A buffer with 4-sample chunks, filled 5 chunks past the cap
    let chunk_len = 4;
    let mut buf = ChunkBuffer::new(chunk_len);
    let overflow = 5;

    // When: Pushing (MAX_CHUNKS + overflow) full chunks, each tagged with
    // its index
    for i in 0..(MAX_CHUNKS + overflow) {
        buf.push(&[i as f32; 4]);
    }

    // Then: Buffer holds MAX_CHUNKS chunks and the oldest were dropped
    let chunks = buf.drain();
    assert_eq!(chunks.len(), MAX_CHUNKS);
    assert!((chunks[0][0] - overflow as f32).abs() < f32::EPSILON);
    let newest = (MAX_CHUNKS + overflow - 1) as f32;
    assert!((chunks[MAX_CHUNKS - 1][0] - newest).abs() < f32::EPSILON);
}

/// WHAT: Clearing the buffer discards full and partial chunks
/// WHY: Aborted sessions must leave no audio behind
#[test]
fn given_buffered_audio_when_cleared_then_drain_returns_nothing() {
    // Given: A buffer holding one full chunk and a partial tail
    let mut buf = ChunkBuffer::new(4);
    buf.push(&[0.25f32; 6]);

    // When: Clearing
    buf.clear();

    // Then: Nothing remains
    assert!(buf.drain().is_empty());
}

/// WHAT: Lock poison recovery preserves buffered chunks
/// WHY: Ensures audio data is never silently lost on mutex poison
#[test]
#[allow(clippy::unwrap_used, clippy::panic)]
fn given_poisoned_mutex_when_recovering_then_chunks_preserved() {
    // Given: A shared buffer poisoned by a panic while holding the lock
    let buf = Arc::new(Mutex::new(ChunkBuffer::new(4)));
    buf.lock().unwrap().push(&[0.5f32; 8]);
    let buf_clone = Arc::clone(&buf);

    let _ = std::thread::spawn(move || {
        let _guard = buf_clone.lock().unwrap();
        panic!("intentional panic to poison mutex");
    })
    .join();

    // When: Recovering from the poisoned lock using unwrap_or_else
    let mut recovered = buf.lock().unwrap_or_else(|e| e.into_inner());

    // Then: Both buffered chunks are fully preserved
    let chunks = recovered.drain();
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().flatten().all(|s| (s - 0.5).abs() < f32::EPSILON));
}
