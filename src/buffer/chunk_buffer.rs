//! Chunk buffer: Ring buffer over the most recent chunks.
//!
//! O(1) amortized push, oldest entries evicted first once the configured
//! capacity is exceeded.

use crate::chunk::Chunk;
use crate::error::ConfigError;
use std::collections::VecDeque;

/// Bounded, insertion-ordered window of recent chunks.
///
/// The length never exceeds the capacity. When a push overflows it, chunks
/// are removed from the front until the window is back at capacity.
#[derive(Debug, Clone)]
pub struct ChunkBuffer {
    /// Chunks stored in the window, oldest first.
    chunks: VecDeque<Chunk>,
    /// Maximum number of chunks to retain.
    capacity: usize,
}

impl ChunkBuffer {
    /// Create a buffer holding at most `capacity` chunks.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidBufferSize(capacity));
        }
        Ok(Self {
            chunks: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        })
    }

    /// Append a chunk, evicting the oldest entries if over capacity.
    pub fn push(&mut self, chunk: Chunk) {
        self.chunks.push_back(chunk);
        while self.chunks.len() > self.capacity {
            self.chunks.pop_front();
        }
    }

    /// Empty the window.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Copy of the window, oldest first.
    pub fn to_vec(&self) -> Vec<Chunk> {
        self.chunks.iter().cloned().collect()
    }

    /// Iterate over the window, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Number of chunks in the window.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Maximum number of chunks retained.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkId, ChunkInput};
    use proptest::prelude::*;
    use std::time::Duration;

    fn chunk(n: u64, content: &str) -> Chunk {
        Chunk::from_input(ChunkId(n), Duration::from_millis(n), ChunkInput::text(content))
    }

    fn contents(buf: &ChunkBuffer) -> Vec<String> {
        buf.iter().map(|c| c.content.clone()).collect()
    }

    #[test]
    fn test_chunk_buffer_zero_capacity() {
        assert!(matches!(
            ChunkBuffer::new(0),
            Err(ConfigError::InvalidBufferSize(0))
        ));
    }

    #[test]
    fn test_chunk_buffer_push() {
        let mut buf = ChunkBuffer::new(4).unwrap();
        buf.push(chunk(0, "a"));
        buf.push(chunk(1, "b"));

        assert_eq!(buf.len(), 2);
        assert_eq!(contents(&buf), vec!["a", "b"]);
        assert_eq!(buf.iter().next_back().map(|c| c.id), Some(ChunkId(1)));
    }

    #[test]
    fn test_chunk_buffer_evicts_oldest() {
        let mut buf = ChunkBuffer::new(2).unwrap();
        buf.push(chunk(0, "a"));
        buf.push(chunk(1, "b"));
        buf.push(chunk(2, "c"));

        assert_eq!(buf.len(), 2);
        assert_eq!(contents(&buf), vec!["b", "c"]);
    }

    #[test]
    fn test_chunk_buffer_to_vec_is_a_copy() {
        let mut buf = ChunkBuffer::new(3).unwrap();
        buf.push(chunk(0, "a"));
        let snapshot = buf.to_vec();
        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content, "a");
    }

    proptest! {
        #[test]
        fn window_holds_most_recent(capacity in 1usize..16, pushes in 0usize..64) {
            let mut buf = ChunkBuffer::new(capacity).unwrap();
            for i in 0..pushes {
                buf.push(chunk(i as u64, &i.to_string()));
                prop_assert_eq!(buf.len(), (i + 1).min(capacity));
            }

            let expected: Vec<String> = (pushes.saturating_sub(capacity)..pushes)
                .map(|i| i.to_string())
                .collect();
            prop_assert_eq!(contents(&buf), expected);
        }
    }
}
