use std::ops::Range;

use crate::header::CHUNK_SIZE;

/// Number of chunks covering `input_len` uncompressed bytes.
pub fn chunk_count(input_len: usize) -> usize {
    assert!(input_len > 0);
    (input_len - 1) / CHUNK_SIZE + 1
}

/// Uncompressed length of chunk `chunk`; only the last chunk may be short.
pub fn chunk_len(input_len: usize, chunk: usize) -> usize {
    let start = chunk * CHUNK_SIZE;
    assert!(start < input_len, "chunk index out of range");
    (input_len - start).min(CHUNK_SIZE)
}

/// Uncompressed byte range covered by chunk `chunk`.
pub fn chunk_range(input_len: usize, chunk: usize) -> Range<usize> {
    let start = chunk * CHUNK_SIZE;
    start..start + chunk_len(input_len, chunk)
}

/// Tracks uncompressed bytes consumed in the chunk being compressed and the
/// container offset at which each completed chunk's segment ends.
#[derive(Debug, Default)]
pub(crate) struct ChunkLedger {
    current_chunk_size: usize,
    offsets: Vec<u32>,
}

impl ChunkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current_chunk_size
    }

    pub fn advance(&mut self, consumed: usize) {
        self.current_chunk_size += consumed;
        debug_assert!(self.current_chunk_size <= CHUNK_SIZE);
    }

    /// Seal the chunk in progress, recording the container offset one past
    /// the end of its compressed segment.
    pub fn complete_chunk(&mut self, end_offset: u32) {
        self.offsets.push(end_offset);
        self.current_chunk_size = 0;
    }

    pub fn completed(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }
}
